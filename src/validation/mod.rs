//! Validation functionality
//!
//! Provides validation logic for:
//! - Schema `type` vocabulary (draft-04 primitive type names)

pub mod types;

pub use types::{VALID_TYPES, validate_type};
