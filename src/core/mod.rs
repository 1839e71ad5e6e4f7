//! Core business logic modules.

pub mod context;
pub mod executor;
pub mod planner;
pub mod scanner;
pub mod tag;
