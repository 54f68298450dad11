//! # rift_scene - Scene orchestration and portals
//!
//! Ties the engine together: authored level data, the two portal entities
//! and their surface generator, player/cube/button/door entities, the
//! per-frame update order, and recursive portal-aware render composition.
//!
//! The scene runs one fixed update per rendered frame. Rendering reads state
//! only after the update completes; portal views recurse through the same
//! render callback with the camera re-expressed through the portal pair.

pub mod audio;
pub mod button;
pub mod cube;
pub mod cutscene;
pub mod door;
pub mod input;
pub mod level;
pub mod player;
pub mod portal;
pub mod portal_surface;
pub mod render;
pub mod scene;
pub mod signals;

pub use audio::{NullSoundPlayer, SoundId, SoundPlayer};
pub use cutscene::{CutsceneDirector, NullCutsceneDirector};
pub use input::{buttons, InputSource, NullInputSource};
pub use level::{ButtonDef, CubeDef, DoorDef, LevelData, LevelError, LevelQuad, PortalSlot, SlotRange};
pub use portal::{Portal, PortalState, FLIP_Y180, MAX_PORTAL_DEPTH};
pub use portal_surface::{PortalSurface, PORTAL_COVERAGE_MIN};
pub use render::{Fragment, ObjectKind, RenderProps, RenderState};
pub use scene::Scene;
pub use signals::SignalSet;
