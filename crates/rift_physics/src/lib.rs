//! # rift_physics - Collision and dynamics scene
//!
//! Wraps Rapier 3D behind the engine's own types and adds the two things a
//! portal game needs from its physics layer:
//!
//! - a portal transform table (the single source of truth for "is portal N
//!   open, and where") consulted every tick to teleport dynamic bodies whose
//!   center crosses an open portal surface, and
//! - trigger overlap reporting as an ordered event sequence returned from
//!   [`CollisionScene::step`], so gameplay dispatch stays outside the solver.

pub mod body;
pub mod config;
pub mod error;
pub mod events;
pub mod layers;
pub mod query;
pub mod scene;
pub mod shapes;

pub use body::{BodyHandle, BodyTag, DynamicObjectDesc, ObjectHandle, StaticHandle};
pub use config::PhysicsConfig;
pub use error::{PhysicsError, Result};
pub use events::{ContactEvent, PortalTransfer, StepResult, TriggerOverlap};
pub use layers::CollisionLayers;
pub use query::{RaycastHit, RaycastOptions, SceneQuery};
pub use scene::{CollisionScene, PORTAL_HALF_HEIGHT, PORTAL_HALF_WIDTH};
pub use shapes::CollisionShape;
