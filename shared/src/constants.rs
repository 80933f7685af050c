/// Default horizontal speed at full axis deflection, in units per second.
pub const DEFAULT_MOVE_SPEED: f32 = 6.0;

/// Default vertical launch speed of a jump, in units per second.
///
/// A jump overwrites the vertical velocity with this value; it is never added.
pub const DEFAULT_JUMP_SPEED: f32 = 12.0;

/// Default offset of the ground probe from the actor origin (local space, units).
///
/// Negative Y places the probe beneath the actor's feet.
pub const DEFAULT_PROBE_OFFSET: [f32; 2] = [0.0, -0.55];

/// Default radius of the ground probe circle (units).
pub const DEFAULT_PROBE_RADIUS: f32 = 0.1;

/// Default collision capsule radius used by the kinematic integrator (units).
pub const DEFAULT_CAPSULE_RADIUS: f32 = 0.25;

/// Default collision capsule half-height (cylinder section only, units).
pub const DEFAULT_CAPSULE_HALF_HEIGHT: f32 = 0.25;

/// Default fixed simulation rate on the authority (Hz).
pub const DEFAULT_TICK_HZ: f32 = 50.0;

/// Upper bound on fixed steps run for a single `advance()` call.
///
/// Stalls longer than this many ticks drop the excess time instead of spiralling.
pub const DEFAULT_MAX_CATCH_UP_STEPS: u32 = 5;

/// Gravity magnitude in units per second squared (positive value, applied along -Y).
pub const GRAVITY: f32 = 9.81;

/// Terminal fall speed (negative, units per second).
pub const TERMINAL_FALL_SPEED: f32 = -30.0;

/// Default port used when a server address omits one.
pub const DEFAULT_PORT: u16 = 7777;
