//! Command-line front end

pub mod commands;

pub use commands::{cmd_build, cmd_cosign, cmd_keygen, cmd_verify, BuildOptions, CliResult};
