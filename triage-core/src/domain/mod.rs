//! Core domain types
//!
//! This module contains the structures the console and controller share:
//! what the user asked for, what the backend returned, and the pipeline
//! state built from those answers.

pub mod code;
pub mod log;
pub mod pipeline;
pub mod query;
