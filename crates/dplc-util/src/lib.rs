//! dplc-util - Shared infrastructure for the DPL compiler.
//!
//! Source location tracking and diagnostic collection. Every phase crate
//! reports through the [`Handler`] defined here; the driver concatenates
//! the per-stage buffers in pipeline order.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, Handler, Severity};
pub use span::Span;
