//! Console logging for the `inimap` binary.
//!
//! The library only emits [`tracing`] events; this module installs the
//! subscriber that renders them.

mod subscriber;

pub use subscriber::{LOG_ENV, init_subscriber};
