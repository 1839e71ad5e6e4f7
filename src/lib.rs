//! h3a Library
//!
//! Archives files by copying each one next to itself under a timestamp-tagged name.

pub mod cli;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod utils;

pub use error::{Error, Result};
