//! pattern-forge CLI library

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod commands;
pub mod output;
pub mod prompt;

pub use commands::{InitCommand, ModelCommand, PatternCommand, StubsCommand};
