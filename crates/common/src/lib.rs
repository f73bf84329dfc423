//! Types and helpers shared by the ads service, the auth service and the gateway.

pub mod types;
pub mod utils;
