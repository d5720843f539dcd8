//! Request extractors for authentication and authorization.
//!
//! # Authentication Flow
//!
//! 1. [`auth::BearerToken`] takes the token from `Authorization: Bearer <token>`
//! 2. [`auth::authenticate`] optionally checks the signature locally, then asks
//!    the auth service who the token belongs to
//! 3. [`auth::require_admin`] loads the caller's profile and checks the role
//!
//! [`auth::AuthUser`] and [`auth::AdminUser`] bundle those steps for handlers
//! that do not need to interleave them with body validation.
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AdminUser, AuthUser};
//!
//! async fn get_me(auth_user: AuthUser) -> impl IntoResponse { /* ... */ }
//!
//! async fn list_users(_admin: AdminUser) -> impl IntoResponse { /* ... */ }
//! ```

pub mod auth;
