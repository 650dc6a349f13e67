//! Foundation utilities shared by every subsystem
//!
//! Math types, frame timing, and logging setup.

pub mod logging;
pub mod math;
pub mod time;
