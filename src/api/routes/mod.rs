//! HTTP route handlers, grouped by resource.

/// Image upload and removal
pub mod files;
/// Root endpoint
pub mod general;
/// Recipe CRUD and recipe of the day
pub mod recipe;
