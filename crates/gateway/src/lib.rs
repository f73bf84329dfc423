pub mod upstream;
pub mod readiness;
pub mod observability;
pub mod views;
pub mod routes;
pub mod bootstrap;

pub use bootstrap::run;
