// HTTP middleware stack

pub mod auth;
pub mod auth_middleware;
pub mod cors;
pub mod rate_limit;

pub use auth::AuthenticatedUser;
pub use auth_middleware::{require_admin, require_instructor, require_student};
pub use cors::dynamic_cors_middleware;
pub use rate_limit::rate_limit_middleware;
