//! Core business logic - framework-agnostic recipe, image and rotation operations.
//!
//! Nothing in here knows about HTTP; the api layer translates requests into these
//! calls and their results back into JSON.

pub mod image;
pub mod recipe;
pub mod rotation;
