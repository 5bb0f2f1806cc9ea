mod diagnostics;
mod error;

pub use self::{
    diagnostics::{BugReport, DiagnosticsCollector},
    error::EngineError,
};

pub mod prelude {
    pub use super::{BugReport, DiagnosticsCollector, EngineError};
}
