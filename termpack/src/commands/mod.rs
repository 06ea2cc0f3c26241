//! Command modules for the termpack CLI.
//!
//! Each subcommand lives in its own file with an `XxxArgs` struct, an
//! `XxxCommand` handler and a `run_xxx` entry point.

pub mod common;

pub mod inspect;
pub mod pack;
pub mod unpack;

pub use inspect::{run_inspect, InspectArgs};
pub use pack::{run_pack, PackArgs};
pub use unpack::{run_unpack, UnpackArgs};
