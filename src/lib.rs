//! Tug of RPS - a rock-paper-scissors tug-of-war toy plus demo scenes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scene state, input resolution, tick)
//! - `renderer`: Shape generation, draw dispatch and the WebGPU backend
//! - `demos`: Entity rosters and canvas demos (sketch pad, polygon fan)
//! - `display`: Status-text collaborator (scoreboard, hands-played line)
//! - `settings`/`tally`: Preferences and win/loss record, LocalStorage-backed

pub mod demos;
pub mod display;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tally;

pub use settings::Settings;
pub use tally::Tally;

/// Fixed tuning constants shared across demos
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Score at which a tug match ends (player +3, AI -3)
    pub const SCORE_LIMIT: i8 = 3;
    /// Horizontal pull distance per animation tick
    pub const PULL_STEP: f32 = 0.01;
    /// Animation ticks granted per resolved round
    pub const ROUND_TICKS: u32 = 10;

    /// Winner celebration spin (degrees per second)
    pub const VICTORY_SPIN_DEG_PER_SEC: f32 = 180.0;
    /// Loser tips over by this much when the match ends
    pub const LOSER_TIP_DEG: f32 = 90.0;
    /// Loser sinks into the mud by this much
    pub const LOSER_DROP: f32 = 0.09;
    /// The rope drops with the loser
    pub const ROPE_DROP: f32 = 0.115;

    /// Windmill fan spin (degrees per second)
    pub const FAN_SPIN_DEG_PER_SEC: f32 = 45.0;
    /// Windmill base yaw while the spin key is held (degrees per millisecond)
    pub const FAN_YAW_DEG_PER_MS: f32 = 0.1;
    /// Lighting-demo spinner rate (degrees per second)
    pub const SPINNER_DEG_PER_SEC: f32 = 45.0;

    /// Camera turn rate while a turn key is held (degrees per millisecond)
    pub const CAM_TURN_DEG_PER_MS: f32 = 0.12;
    /// Camera travel rate while a move key is held (units per millisecond)
    pub const CAM_MOVE_PER_MS: f32 = 0.02;
    /// Perspective projection parameters shared by the 3D scenes
    pub const CAM_FOV_DEG: f32 = 75.0;
    pub const CAM_NEAR: f32 = 1.0;
    pub const CAM_FAR: f32 = 100.0;

    /// A polygon cannot drop below a triangle
    pub const MIN_SIDES: u32 = 3;
    /// Vertex count of the star outline
    pub const STAR_POINTS: u32 = 10;
    /// Default brush size for the sketch pad
    pub const DEFAULT_POINT_SIZE: f32 = 10.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Camera look direction for a heading in degrees: (cos a, -sin a)
#[inline]
pub fn look_vector(angle_deg: f32) -> (f32, f32) {
    let rad = angle_deg.to_radians();
    (rad.cos(), -rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees_bounds() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
        assert!((wrap_degrees(-90.0) - 270.0).abs() < 1e-6);
        assert!(wrap_degrees(-0.0001) < 360.0);
    }

    #[test]
    fn test_look_vector_cardinals() {
        let (x, z) = look_vector(0.0);
        assert!((x - 1.0).abs() < 1e-6 && z.abs() < 1e-6);
        let (x, z) = look_vector(90.0);
        assert!(x.abs() < 1e-6 && (z + 1.0).abs() < 1e-6);
        let (x, z) = look_vector(270.0);
        assert!(x.abs() < 1e-5 && (z - 1.0).abs() < 1e-5);
    }
}
