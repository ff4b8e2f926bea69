//! rail-hub: utility scripts for the RAIL package family
//!
//! Clones and installs sibling packages listed in a package descriptor,
//! renders example notebooks to HTML and reports what the RAIL plugin
//! registry discovered.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
