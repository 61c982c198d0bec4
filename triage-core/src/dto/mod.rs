//! Data Transfer Objects for backend communication
//!
//! Wire shapes exchanged with the diagnosis backend and the gateway. Response
//! types are parsed leniently: a malformed field degrades to an empty value
//! instead of failing the whole response.

pub mod code;
pub mod debug;
mod lenient;
pub mod logs;
pub mod repo;
