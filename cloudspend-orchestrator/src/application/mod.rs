//! Orchestrator application layer

pub mod narrative;
pub mod synthesis;
pub mod use_cases;

pub use narrative::{NarrativeGenerator, format_currency};
pub use synthesis::{ResultSynthesizer, SynthesisOptions};
pub use use_cases::RunAnalysisUseCase;
