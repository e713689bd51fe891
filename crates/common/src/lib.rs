//! Common utilities for panelkit
//!
//! Shared between the wire-format crate and the host binary: the run-level
//! error taxonomy and the tracing subscriber setup.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::setup_logging;
