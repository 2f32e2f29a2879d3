// Module structure for the ALAS log engine.

// Core infrastructure
pub mod counter;
pub mod error;
pub mod parser;
pub mod session;

// Analysis
pub mod analyzers;
pub mod pipeline;

pub use counter::FrequencyMap;
pub use error::{EngineError, Result};
pub use parser::{parse, Level, LogRecord, ParseStats, RecordParser};
pub use pipeline::{Pipeline, PipelineOptions};
pub use session::SessionContext;
