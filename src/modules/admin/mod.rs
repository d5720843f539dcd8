//! Admin-only user lifecycle operations: deletion and orphan cleanup.

pub mod cleanup;
pub mod controller;
pub mod router;
pub mod service;
