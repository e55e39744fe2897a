//! PostgREST client for the hosted relational data service.
//!
//! This crate provides:
//! - Typed repositories for companies, professionals, jobs, applications
//!   and blog content
//! - A filter/order/range query builder rendered as PostgREST query pairs
//! - Service-key authentication, retry with backoff, request metrics

pub mod applications_repo;
pub mod blog_repo;
pub mod client;
pub mod error;
pub mod jobs_repo;
pub mod metrics;
pub mod query;
pub mod repos;
pub mod retry;

pub use applications_repo::{ApplicationFilter, ApplicationRepository};
pub use blog_repo::{CategoryRepository, PostFilter, PostRepository, TagRepository};
pub use client::{PostgrestClient, PostgrestConfig};
pub use error::{PostgrestError, PostgrestResult};
pub use jobs_repo::{JobFilter, JobRepository};
pub use query::Query;
pub use repos::{CompanyFilter, CompanyRepository, ProfessionalFilter, ProfessionalRepository};
