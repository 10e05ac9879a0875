//! Configuration module for karamel
//!
//! Provides CLI arguments, algorithm selection and runtime settings.

mod settings;

pub use settings::*;
