//! Triage Core
//!
//! Core types and state machine for the Triage debugging console.
//!
//! This crate contains:
//! - Domain types: query parameters, log lines, code snippets, and the pipeline state
//! - DTOs: wire shapes exchanged with the diagnosis backend
//! - Resolver, gates, and the time initializer that feed the pipeline controller
//!
//! Nothing in here performs I/O. The async controller lives in `triage-client`.

pub mod clock;
pub mod domain;
pub mod dto;
pub mod form;
pub mod gate;
pub mod resolver;
