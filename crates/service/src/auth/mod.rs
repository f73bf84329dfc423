//! Auth module: an immutable allow-list of student ids and the login check on top of it.
//!
//! There is no session or token; an accepted `student_id` is what callers
//! pass around afterwards.

pub mod allow_list;
pub mod errors;
pub mod service;

pub use allow_list::AllowList;
pub use service::AuthService;
