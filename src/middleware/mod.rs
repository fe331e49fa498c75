pub mod auth;
pub mod policy;
pub mod response;

pub use auth::{authenticate, AuthUser};
pub use policy::{require_manager, require_self_or_manager};
pub use response::{ApiResponse, ApiResult};
