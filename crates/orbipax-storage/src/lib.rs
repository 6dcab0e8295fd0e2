//! orbipax-storage
//!
//! The persistence port for step records and its adapters: in-memory,
//! local JSON files, and S3. Every adapter is scoped to one organization.

pub mod client;
pub mod error;
pub mod file;
pub mod memory;
pub mod objects;
pub mod port;
pub mod s3;
