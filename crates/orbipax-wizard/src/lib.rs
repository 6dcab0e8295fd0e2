//! orbipax-wizard
//!
//! Session-scoped wizard state: per-step drafts, the step navigator, and the
//! intake session that ties them to validation and persistence.

pub mod draft;
pub mod error;
pub mod navigator;
pub mod session;
