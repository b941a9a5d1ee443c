pub mod error;
pub mod pagination;
pub mod password;
pub mod time;
pub mod validation;

pub use error::{ApiError, ApiResponse};
pub use pagination::{PageQuery, PageSettings};
