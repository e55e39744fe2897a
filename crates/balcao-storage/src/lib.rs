//! S3-compatible object storage client.
//!
//! This crate provides:
//! - Upload passthrough for resumes and company logos
//! - Presigned GET/PUT URL generation
//! - Object deletion
//! - Namespaced key construction and validation

pub mod client;
pub mod error;
pub mod keys;

pub use client::{ObjectStore, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use keys::{logo_key, resume_key, validate_key};
