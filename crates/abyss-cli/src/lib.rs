//! Abyss survey CLI library.
//!
//! Terminal styling, logging setup and output formatting shared by the
//! `abyss-cli` binary and its tests.

pub mod logging;
pub mod output;
pub mod terminal;
