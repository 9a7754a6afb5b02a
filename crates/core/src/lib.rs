pub mod case;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use case::CharCase;
pub use diagnostics::{CONTEXT_SEPARATOR, Diagnostic, Level, ListRecorder, Recorder};
pub use error::ParseCharCaseError;
pub use types::{RefId, RuleTag};
