//! Collision scene configuration

use serde::{Deserialize, Serialize};

/// Collision scene configuration. One fixed tick runs per rendered frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 in Y)
    pub gravity: [f32; 3],

    /// Fixed timestep for one simulation tick
    pub timestep: f32,

    /// Solver iterations for velocity
    pub velocity_iterations: usize,

    /// Enable continuous collision detection for fast bodies
    pub ccd_enabled: bool,

    /// Default friction coefficient
    pub default_friction: f32,

    /// Default restitution (bounciness)
    pub default_restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            timestep: 1.0 / 60.0,
            velocity_iterations: 4,
            ccd_enabled: true,
            default_friction: 0.5,
            default_restitution: 0.0,
        }
    }
}

impl PhysicsConfig {
    /// Set gravity
    pub fn with_gravity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.gravity = [x, y, z];
        self
    }

    /// Set timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }
}
