//! orbipax-core
//!
//! Pure domain types for the intake wizard: step identifiers, the canonical
//! shape of every step, field normalizers, the storage/canonical mapper and
//! storage key conventions. No I/O lives here.

pub mod error;
pub mod mapper;
pub mod models;
pub mod normalize;
pub mod step;
pub mod storage_keys;
