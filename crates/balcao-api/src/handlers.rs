//! Request handlers.

pub mod admin;
pub mod applications;
pub mod blog;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod professionals;
pub mod uploads;

pub use admin::*;
pub use applications::*;
pub use blog::*;
pub use companies::*;
pub use health::*;
pub use jobs::*;
pub use professionals::*;
pub use uploads::*;
