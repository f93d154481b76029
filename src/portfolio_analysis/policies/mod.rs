pub mod analyzer_eligibility;

pub use analyzer_eligibility::{AnalyzerDefinition, AnalyzerIdentity, AnalyzerRegistry, ClaimRule};
