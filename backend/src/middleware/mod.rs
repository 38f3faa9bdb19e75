//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, currently the
//! trace identifier and access logging.

pub mod trace;

pub use trace::Trace;
