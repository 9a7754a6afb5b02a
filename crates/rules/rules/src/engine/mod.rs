pub mod matcher;
pub mod trace;

pub use matcher::{CompiledPattern, Matcher};
pub use trace::{MatchTrace, PatternTraceEntry, PatternTraceResult};
