//! Portal Engine - query orchestration and transport routing
//!
//! Wires the core pieces into the two list operations of the works read API
//! and wraps their results in the transport response envelope.

pub mod commands;
pub mod router;
