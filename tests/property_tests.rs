//! Property tests entry point
//!
//! Includes the property modules from the property/ subdirectory.

mod property;
