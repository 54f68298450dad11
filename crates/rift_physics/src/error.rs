//! Error types for the collision scene

use thiserror::Error;

/// Collision scene errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Dynamic object not found
    #[error("Dynamic object not found: {0:?}")]
    ObjectNotFound(crate::body::ObjectHandle),

    /// Rigid body missing from the body set
    #[error("Rigid body not found: {0:?}")]
    BodyNotFound(crate::body::BodyHandle),

    /// Portal index out of range (only 0 and 1 exist)
    #[error("Portal index out of range: {0}")]
    InvalidPortalIndex(usize),

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for collision scene operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
