#![warn(missing_docs)]

//! Error types for the kinematics library.
//!
//! This module defines error types that can occur when constructing the
//! tile frame or the constant-speed stepper.

use core::fmt;

/// Errors that can occur in kinematic setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KinematicsError {
    /// Error for invalid tile size.
    /// This variant is returned when a tile size is provided that is not positive and finite.
    InvalidTileSize(&'static str),
    /// Error for invalid speed.
    /// This variant is returned when a speed is provided that is not positive and finite.
    InvalidSpeed(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidTileSize(msg) => write!(f, "Invalid tile size: {}", msg),
            KinematicsError::InvalidSpeed(msg) => write!(f, "Invalid speed: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
