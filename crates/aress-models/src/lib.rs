//! # Aress Models
//!
//! Domain models and DTOs for the Aress CRM API.
//!
//! Records coming back from the hosted platform are loosely typed JSON or
//! rows; everything in this crate is the validated, strongly-typed form they
//! are mapped into at the boundary.
//!
//! # Modules
//!
//! - [`ids`]: the [`UserId`] newtype shared by identities and profiles
//! - [`roles`]: the CRM [`Role`] and its permission helpers
//! - [`users`]: identities, profiles and user-administration DTOs

pub mod ids;
pub mod roles;
pub mod users;

pub use ids::{InvalidUserId, UserId};
pub use roles::{Permissions, Role, UnknownRole};
pub use users::{
    CurrentUser, DeleteUserRequest, Identity, IdentityMetadata, NewProfile, Profile, ProfileUpdate,
    SweepReport, UpdateUserDto,
};
