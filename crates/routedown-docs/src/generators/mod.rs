//! Output generators for the route model.

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "markdown")]
pub mod markdown;
