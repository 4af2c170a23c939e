//! Pulse core domain logic.
//!
//! Pure scheduling primitives shared by the delivery engine and the API
//! server: quiet-hours evaluation and check-in cadence computation. This
//! crate has no internal dependencies and performs no I/O.

pub mod cadence;
pub mod error;
pub mod quiet_hours;
pub mod types;
