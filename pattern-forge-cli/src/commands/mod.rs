//! CLI command implementations

pub mod init;
pub mod model;
pub mod pattern;
pub mod stubs;

pub use init::InitCommand;
pub use model::ModelCommand;
pub use pattern::PatternCommand;
pub use stubs::StubsCommand;
