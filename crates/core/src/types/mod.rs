//! Core types for Rare Thread.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod identifier;

pub use email::{Email, EmailError};
pub use id::*;
pub use identifier::UserIdentifier;
