//! CLI commands

mod init;
mod run;
mod variants;

pub use init::InitCommand;
pub use run::RunCommand;
pub use variants::VariantsCommand;
