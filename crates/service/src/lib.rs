//! Service layer providing the ad and login business operations on top of models.
//! - Separates business logic from data access (`ads::repository::AdRepository`).
//! - Reuses validation and document definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod ads;
pub mod auth;
#[cfg(test)]
pub mod test_support;
