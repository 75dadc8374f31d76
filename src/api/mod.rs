//! REST API over the todo database.

pub mod error;
mod server;
mod todos;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use server::{ApiServer, ServerHandle, build_router, start_server};
