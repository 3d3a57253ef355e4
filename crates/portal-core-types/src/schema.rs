//! Canonical schema constants for structured logging
//!
//! Every log line emitted by the query path uses these keys so that
//! production JSON output can be filtered uniformly.

// Field keys the capture layer lifts out of every event
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
