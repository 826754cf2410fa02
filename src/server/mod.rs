mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{router, AppState};
