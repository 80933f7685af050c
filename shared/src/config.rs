//! Typed configuration for actors, the relay tick and the connection endpoint.
//!
//! Every struct has sensible defaults, can be loaded from RON, and is validated before
//! the relay accepts it. Actor tunables are fixed at spawn time.

use std::{
    net::{SocketAddr, ToSocketAddrs},
    time::Duration,
};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::{
    bitmask_flags::LayerMask,
    constants::{
        DEFAULT_CAPSULE_HALF_HEIGHT, DEFAULT_CAPSULE_RADIUS, DEFAULT_JUMP_SPEED,
        DEFAULT_MAX_CATCH_UP_STEPS, DEFAULT_MOVE_SPEED, DEFAULT_PORT, DEFAULT_PROBE_OFFSET,
        DEFAULT_PROBE_RADIUS, DEFAULT_TICK_HZ, GRAVITY, TERMINAL_FALL_SPEED,
    },
    error::RelayError,
};

/// Per-actor tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Horizontal speed at full axis deflection (units/sec).
    pub move_speed: f32,
    /// Vertical launch speed of a grounded jump (units/sec).
    pub jump_speed: f32,
    /// Ground probe center relative to the actor origin.
    pub probe_offset: [f32; 2],
    /// Ground probe radius, must be > 0.
    pub probe_radius: f32,
    /// Surfaces counted as ground for this actor.
    pub ground_layers: LayerMask,
    /// Collision capsule radius (used by kinematic integration).
    pub capsule_radius: f32,
    /// Collision capsule half-height (cylinder section only).
    pub capsule_half_height: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            jump_speed: DEFAULT_JUMP_SPEED,
            probe_offset: DEFAULT_PROBE_OFFSET,
            probe_radius: DEFAULT_PROBE_RADIUS,
            ground_layers: LayerMask::ground(),
            capsule_radius: DEFAULT_CAPSULE_RADIUS,
            capsule_half_height: DEFAULT_CAPSULE_HALF_HEIGHT,
        }
    }
}

impl ActorConfig {
    pub fn probe_offset(&self) -> Vector2<f32> {
        Vector2::new(self.probe_offset[0], self.probe_offset[1])
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        let finite = [
            self.move_speed,
            self.jump_speed,
            self.probe_offset[0],
            self.probe_offset[1],
            self.probe_radius,
            self.capsule_radius,
            self.capsule_half_height,
        ]
        .iter()
        .all(|v| v.is_finite());

        if !finite {
            return Err(RelayError::InvalidConfig(
                "actor tunables must be finite".into(),
            ));
        }
        if self.move_speed < 0.0 || self.jump_speed < 0.0 {
            return Err(RelayError::InvalidConfig(
                "move_speed and jump_speed must be non-negative".into(),
            ));
        }
        if self.probe_radius <= 0.0 {
            return Err(RelayError::InvalidConfig(
                "probe_radius must be greater than zero".into(),
            ));
        }
        if self.capsule_radius <= 0.0 || self.capsule_half_height < 0.0 {
            return Err(RelayError::InvalidConfig(
                "capsule dimensions must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Relay-wide simulation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Fixed simulation rate on the authority (ticks/sec), must be > 0.
    pub tick_rate_hz: f32,
    /// Maximum number of fixed steps a single `advance()` may run.
    pub max_catch_up_steps: u32,
    /// Gravity magnitude used by the bundled integrators (positive, along -Y).
    pub gravity: f32,
    /// Terminal fall speed (negative).
    pub terminal_fall_speed: f32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_HZ,
            max_catch_up_steps: DEFAULT_MAX_CATCH_UP_STEPS,
            gravity: GRAVITY,
            terminal_fall_speed: TERMINAL_FALL_SPEED,
        }
    }
}

impl RelayConfig {
    /// Parses a RON document, falling back to defaults for missing fields.
    pub fn from_ron(source: &str) -> Result<Self, RelayError> {
        let config: Self =
            ron::from_str(source).map_err(|e| RelayError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(RelayError::InvalidConfig(
                "tick_rate_hz must be greater than zero".into(),
            ));
        }
        match Duration::try_from_secs_f32(1.0 / self.tick_rate_hz) {
            Ok(step) if !step.is_zero() => {}
            _ => {
                return Err(RelayError::InvalidConfig(format!(
                    "tick_rate_hz {} does not give a representable tick length",
                    self.tick_rate_hz
                )));
            }
        }
        if self.max_catch_up_steps == 0 {
            return Err(RelayError::InvalidConfig(
                "max_catch_up_steps must be at least 1".into(),
            ));
        }
        if !(self.gravity.is_finite() && self.terminal_fall_speed.is_finite()) {
            return Err(RelayError::InvalidConfig(
                "gravity settings must be finite".into(),
            ));
        }
        if self.terminal_fall_speed > 0.0 {
            return Err(RelayError::InvalidConfig(
                "terminal_fall_speed must be negative or zero".into(),
            ));
        }
        Ok(())
    }

    /// Length of one fixed tick. Unvalidated rates fall back to the default tick.
    pub fn fixed_dt(&self) -> Duration {
        Duration::try_from_secs_f32(1.0 / self.tick_rate_hz)
            .ok()
            .filter(|step| !step.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f32(1.0 / DEFAULT_TICK_HZ))
    }
}

/// Address of the authoritative server as entered by a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: DEFAULT_PORT,
        }
    }
}

impl ConnectionConfig {
    /// Parses `host`, `host:port` or `[v6]:port`. A missing port uses [`DEFAULT_PORT`].
    pub fn parse(input: &str) -> Result<Self, RelayError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RelayError::InvalidConfig("server address is empty".into()));
        }

        if let Ok(addr) = input.parse::<SocketAddr>() {
            return Ok(Self {
                host: addr.ip().to_string(),
                port: addr.port(),
            });
        }

        match input.rsplit_once(':') {
            // A bare IPv6 address contains colons but no port.
            Some((host, _)) if host.contains(':') => Ok(Self {
                host: input.to_string(),
                port: DEFAULT_PORT,
            }),
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| RelayError::InvalidConfig(format!("invalid port `{port}`")))?;
                if host.is_empty() {
                    return Err(RelayError::InvalidConfig("server host is empty".into()));
                }
                Ok(Self {
                    host: host.to_string(),
                    port,
                })
            }
            None => Ok(Self {
                host: input.to_string(),
                port: DEFAULT_PORT,
            }),
        }
    }

    /// Resolves the endpoint to the first matching socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, RelayError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| RelayError::InvalidConfig(e.to_string()))?
            .next()
            .ok_or_else(|| RelayError::InvalidConfig(format!("`{}` did not resolve", self.host)))
    }
}
