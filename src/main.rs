use anyhow::Context;
use indicatif::MultiProgress;
use owo_colors::OwoColorize;
use portfolio_analyzer::adapters::outbound::console::{
    StderrProgressReporter, TracingProgressReporter,
};
use portfolio_analyzer::adapters::outbound::filesystem::{FileSystemReader, FileSystemWriter};
use portfolio_analyzer::adapters::outbound::memory::{
    AdvisoryFeed, AdvisoryFeedFinder, InMemoryPortfolioStore, PortfolioSnapshot,
};
use portfolio_analyzer::adapters::outbound::notification::{
    JsonLinesNotificationBus, TracingNotificationBus,
};
use portfolio_analyzer::application::dto::{ScanOptions, ScanOutcome, ScanSummary};
use portfolio_analyzer::application::use_cases::{
    AnalysisStats, AnalyzeComponentsUseCase, PortfolioBatchScanner,
};
use portfolio_analyzer::cli::Args;
use portfolio_analyzer::config::{self, ConfigFile};
use portfolio_analyzer::logging::{self, LogFormat};
use portfolio_analyzer::portfolio_analysis::policies::{AnalyzerIdentity, AnalyzerRegistry};
use portfolio_analyzer::ports::outbound::ProgressReporter;
use portfolio_analyzer::shared::error::{AnalysisError, ExitCode};
use portfolio_analyzer::shared::Result;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Result of one analyzer's full scan
struct AnalyzerReport {
    identity: AnalyzerIdentity,
    summary: ScanSummary,
    stats: AnalysisStats,
}

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    if let Err(e) = logging::init_tracing(args.log_format, &args.log_level) {
        eprintln!("❌ {}", e);
        process::exit(ExitCode::InvalidArguments.as_i32());
    }

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let options = scan_options(&config, &args);
    let registry = Arc::new(config.registry()?);
    let selected = select_analyzers(&registry, &args.analyzers)?;

    // Create adapters (Dependency Injection)
    let reader = FileSystemReader::new();
    let snapshot = reader.read_snapshot(&args.snapshot)?;
    let store = InMemoryPortfolioStore::from_snapshot(&snapshot)?;
    let feed = match &args.advisories {
        Some(path) => reader.read_advisories(path)?,
        None => {
            eprintln!("⚠️  Warning: No advisory feed given; no vulnerabilities can be found.");
            AdvisoryFeed::default()
        }
    };
    let finder = Arc::new(AdvisoryFeedFinder::new(feed));

    let writer: Box<dyn Write + Send> = match &args.output {
        Some(path) => Box::new(FileSystemWriter::new(path.clone()).create()?),
        None => Box::new(io::stdout()),
    };
    let sink = Arc::new(JsonLinesNotificationBus::new(writer));
    let bus = Arc::new(TracingNotificationBus::new(sink.clone()));

    let cancellation = CancellationToken::new();
    spawn_interrupt_handler(cancellation.clone());

    let multi = MultiProgress::new();
    let mut tasks = JoinSet::new();
    for (index, identity) in selected.into_iter().enumerate() {
        let reporter = progress_reporter(&args, &multi, &identity);
        let scanner = PortfolioBatchScanner::new(store.clone(), reporter, options)?
            .with_cancellation(cancellation.clone());
        let analyzer = AnalyzeComponentsUseCase::new(
            identity.clone(),
            registry.clone(),
            finder.clone(),
            store.clone(),
            store.clone(),
            bus.clone(),
        )?;

        tasks.spawn(async move {
            let summary = scanner.run_full_scan(&analyzer).await;
            (index, identity, summary, analyzer.stats())
        });
    }

    let mut reports = Vec::new();
    let mut first_error: Option<anyhow::Error> = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, identity, Ok(summary), stats)) => reports.push((
                index,
                AnalyzerReport {
                    identity,
                    summary,
                    stats,
                },
            )),
            Ok((_, identity, Err(e), _)) => {
                first_error.get_or_insert(e.context(format!("Analyzer '{}' failed", identity)));
            }
            Err(e) => {
                first_error.get_or_insert(anyhow::anyhow!("Analyzer task failed: {}", e));
            }
        }
    }
    reports.sort_by_key(|(index, _)| *index);
    let reports: Vec<AnalyzerReport> = reports.into_iter().map(|(_, report)| report).collect();

    sink.flush()?;
    if let Some(path) = &args.output {
        eprintln!("✅ Output complete: {}", path.display());
    }

    // notifications already went out, so persist before reporting any failure
    if args.update_snapshot {
        save_associations(&args.snapshot, snapshot, &store)?;
    }
    if let Some(e) = first_error {
        return Err(e);
    }

    print_summary(&reports);
    Ok(exit_code(&reports))
}

/// Rewrites the snapshot with every association now known to the store.
fn save_associations(
    path: &Path,
    mut snapshot: PortfolioSnapshot,
    store: &InMemoryPortfolioStore,
) -> Result<()> {
    let known = snapshot.associations.len();
    snapshot.associations = store.associations();
    FileSystemWriter::new(path.to_path_buf())
        .write_json(&snapshot)
        .context("Failed to update portfolio snapshot")?;
    tracing::info!(
        path = %path.display(),
        associations = snapshot.associations.len(),
        "Snapshot updated"
    );
    eprintln!(
        "💾 Snapshot updated: {} association(s), {} new",
        snapshot.associations.len(),
        snapshot.associations.len().saturating_sub(known)
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => config::load_config_from_path(path),
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| anyhow::anyhow!("Failed to resolve current directory: {}", e))?;
            Ok(config::discover_config(&cwd)?.unwrap_or_default())
        }
    }
}

/// Command-line flags win over the config file.
fn scan_options(config: &ConfigFile, args: &Args) -> ScanOptions {
    let mut options = config.scan_options();
    if let Some(page_size) = args.page_size {
        options.page_size = page_size;
    }
    if args.fail_fast {
        options.fail_fast = true;
    }
    options
}

fn select_analyzers(
    registry: &AnalyzerRegistry,
    requested: &[String],
) -> Result<Vec<AnalyzerIdentity>> {
    if requested.is_empty() {
        return Ok(registry
            .definitions()
            .iter()
            .map(|definition| definition.identity.clone())
            .collect());
    }

    let mut selected: Vec<AnalyzerIdentity> = Vec::new();
    for name in requested {
        let identity = AnalyzerIdentity::new(name.as_str());
        if !registry.contains(&identity) {
            let known: Vec<&str> = registry
                .definitions()
                .iter()
                .map(|definition| definition.identity.as_str())
                .collect();
            return Err(AnalysisError::configuration(
                format!("unknown analyzer '{}'", name),
                format!("Configured analyzers: {}", known.join(", ")),
            )
            .into());
        }
        if !selected.contains(&identity) {
            selected.push(identity);
        }
    }
    Ok(selected)
}

fn progress_reporter(
    args: &Args,
    multi: &MultiProgress,
    identity: &AnalyzerIdentity,
) -> Box<dyn ProgressReporter> {
    if args.no_progress || args.log_format == LogFormat::Json {
        Box::new(TracingProgressReporter::new(identity.as_str()))
    } else {
        Box::new(StderrProgressReporter::attached(
            multi.clone(),
            identity.as_str(),
        ))
    }
}

fn spawn_interrupt_handler(cancellation: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n⏹️  Interrupted; finishing the current batch before stopping...");
            cancellation.cancel();
        }
    });
}

fn print_summary(reports: &[AnalyzerReport]) {
    eprintln!();
    eprintln!("{}", "📊 Portfolio analysis summary".bold());
    for report in reports {
        let status = match &report.summary.outcome {
            ScanOutcome::Aborted { .. } => "aborted".red().to_string(),
            ScanOutcome::Cancelled => "cancelled".yellow().to_string(),
            ScanOutcome::Completed if report.summary.has_failures() => {
                "completed with failures".yellow().to_string()
            }
            ScanOutcome::Completed => "completed".green().to_string(),
        };
        eprintln!("   {} [{}]", report.identity.bold(), status);
        eprintln!("      {}", report.summary);
        eprintln!(
            "      {} analyzed, {} skipped, {} finding(s), {} new association(s)",
            report.stats.components_analyzed,
            report.stats.components_skipped,
            report.stats.findings,
            report.stats.new_associations
        );
        for failure in &report.summary.fetch_failures {
            eprintln!(
                "      {} page {} fetch attempt {}: {}",
                "↻".yellow(),
                failure.page,
                failure.attempt,
                failure.error
            );
        }
        for failure in &report.summary.failures {
            eprintln!(
                "      {} batch {} (components {}..={}): {}",
                "⚠️ ".yellow(),
                failure.page,
                failure.first_component,
                failure.last_component,
                failure.error
            );
        }
    }

    let new_associations: u64 = reports.iter().map(|r| r.stats.new_associations).sum();
    if new_associations > 0 {
        eprintln!(
            "\n🔔 {} new vulnerability association(s) reported",
            new_associations.to_string().red().bold()
        );
    } else {
        eprintln!("\n{}", "✅ No new vulnerabilities found".green());
    }
}

fn exit_code(reports: &[AnalyzerReport]) -> ExitCode {
    // partial coverage outranks findings
    if reports.iter().any(|r| !r.summary.is_clean()) {
        return ExitCode::ApplicationError;
    }
    if reports.iter().any(|r| r.stats.new_associations > 0) {
        ExitCode::NewVulnerabilitiesFound
    } else {
        ExitCode::Success
    }
}
