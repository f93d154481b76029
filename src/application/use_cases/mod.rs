/// Use cases module containing application business logic orchestration
mod analyze_components;
mod scan_portfolio;

pub use analyze_components::{AnalysisStats, AnalyzeComponentsUseCase};
pub use scan_portfolio::{BatchAnalyzer, PortfolioBatchScanner};
