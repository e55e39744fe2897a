//! Shared data models for the Balcao backend.
//!
//! This crate provides Serde-serializable types for:
//! - Companies, professionals, job postings and applications
//! - Blog posts, categories and tags
//! - Pagination envelopes
//!
//! Rust field names are English; the wire/table names the hosted data
//! service uses are Portuguese and carried as serde renames.

pub mod application;
pub mod blog;
pub mod company;
pub mod job;
pub mod pagination;
pub mod professional;

// Re-export common types
pub use application::{ApplicationPatch, ApplicationStatus, JobApplication, NewApplication};
pub use blog::{BlogPost, Category, NewPost, PostPatch, PostStatus, Tag};
pub use company::{Company, CompanyPatch, ListingStatus, NewCompany};
pub use job::{ContractType, JobPatch, JobPosting, JobStatus, NewJob};
pub use pagination::{Page, PageQuery};
pub use professional::{NewProfessional, Professional, ProfessionalPatch};
