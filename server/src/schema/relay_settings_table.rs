use motion_relay::{
    rapier_world::rapier2d::control::{CharacterLength, KinematicCharacterController},
    RelayConfig,
};
use spacetimedb::*;

/// Simulation settings shared by server and clients.
///
/// Single-row table (`id = 1`) seeded by `init`. The server reads it every tick to build
/// the integrator; clients subscribe to mirror gravity and tick rate for presentation.
///
/// Values are in meters, seconds and degrees (converted to radians at runtime).
#[table(name = relay_settings, public)]
pub struct RelaySettings {
    #[primary_key]
    pub id: u32,

    /// Fixed simulation rate (Hz).
    pub tick_rate_hz: f32,

    /// Upper bound on a single step's delta time (seconds). Longer stalls are not replayed.
    pub max_delta_seconds: f32,

    /// Downward acceleration magnitude (m/s^2).
    pub gravity: f32,

    /// Fastest allowed downward speed (negative, m/s).
    pub terminal_fall_speed: f32,

    /// Small gap preserved between the character and its surroundings (meters).
    pub offset: f32,

    /// Maximum climbable slope angle (degrees).
    pub max_slope_climb_deg: f32,

    /// Minimum slope angle (degrees) before automatic sliding starts.
    pub min_slope_slide_deg: f32,

    /// Whether the controller should slide against obstacles.
    pub slide: bool,

    /// Increase if the character gets stuck when sliding (small, meters).
    pub normal_nudge_factor: f32,
}

impl RelaySettings {
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            tick_rate_hz: self.tick_rate_hz,
            gravity: self.gravity,
            terminal_fall_speed: self.terminal_fall_speed,
            ..RelayConfig::default()
        }
    }

    /// Rapier character controller configured from this row.
    pub fn character_controller(&self) -> KinematicCharacterController {
        KinematicCharacterController {
            offset: CharacterLength::Absolute(self.offset),
            max_slope_climb_angle: self.max_slope_climb_deg.to_radians(),
            min_slope_slide_angle: self.min_slope_slide_deg.to_radians(),
            slide: self.slide,
            normal_nudge_factor: self.normal_nudge_factor,
            ..KinematicCharacterController::default()
        }
    }
}
