//! # Aress Core
//!
//! Core types shared by every Aress crate.
//!
//! - [`errors`]: the application error type and its HTTP mapping
//! - [`response`]: the `{ success, data | error }` JSON envelopes
//!
//! # Example
//!
//! ```ignore
//! use aress_core::{AppError, SuccessResponse};
//!
//! async fn handler() -> Result<Json<SuccessResponse>, AppError> {
//!     Err(AppError::forbidden("Only admins can delete users"))
//! }
//! ```

pub mod errors;
pub mod response;

pub use errors::{AppError, ErrorKind};
pub use response::{DataResponse, ErrorResponse, SuccessResponse};
