//! Deterministic simulation module
//!
//! All animated-scene logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Fixed entity roster, iteration in insertion order
//! - No rendering or platform dependencies

pub mod input;
pub mod rps;
pub mod state;
pub mod tick;

pub use input::{HeldKeys, PlayerAction, resolve};
pub use rps::{Hand, Outcome, ai_hand, judge};
pub use state::{
    Camera, Entity, EntityKind, GamePhase, GeometryId, SceneState, TextureId, Windmill, Winner,
};
pub use tick::{TickInput, tick};
