//! Library half of the `labtrack` binary: logging setup and the commands,
//! kept separate from argument parsing and table output so they can be
//! driven from tests.

pub mod commands;
pub mod logging;
pub mod types;
