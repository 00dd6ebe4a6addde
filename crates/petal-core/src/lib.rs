//! Petal Core - Foundational types for the Petal flower renderer
//!
//! This crate provides the types every other Petal crate depends on:
//! - `Color` - RGB color with hex and HSL helpers
//! - Error types and Result alias

mod color;
mod error;

pub use color::Color;
pub use error::{PetalError, Result};
