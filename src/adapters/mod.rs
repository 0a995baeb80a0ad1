//! Adapters driving external coverage tooling.

pub mod command_reporter;
pub mod command_runner;
pub mod mock;
pub(crate) mod process;
pub mod statement_reporter;

pub use command_reporter::CommandReporter;
pub use command_runner::CommandTestRunner;
pub use mock::{MockReporter, MockRun, MockTestRunner};
pub use statement_reporter::StatementReporter;
