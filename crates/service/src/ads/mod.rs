//! Ads: repository seam (MongoDB and in-memory) and the ownership-aware service on top.

pub mod repository;
pub mod repo;
pub mod service;

pub use service::AdService;
