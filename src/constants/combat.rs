//! Player attack constants.

/// Default melee reach when weapon metadata is missing (world units).
pub const MELEE_DEFAULT_REACH: f32 = 8.0;
/// Default full melee arc in degrees.
pub const MELEE_DEFAULT_ARC_DEG: f32 = 120.0;
/// Default melee damage.
pub const MELEE_DEFAULT_DAMAGE: i32 = 10;
/// Default attack cooldown in seconds.
pub const ATTACK_DEFAULT_COOLDOWN: f32 = 0.8;
/// Clip fraction at which a melee swing applies its hit test.
pub const MELEE_FIRE_FRACTION: f32 = 0.45;
/// Clip fraction past which a swing can no longer register hits.
pub const MELEE_ACTIVE_END_FRACTION: f32 = 0.75;

/// Shockwave ring expansion speed (units/s).
pub const SHOCKWAVE_SPEED: f32 = 14.0;
/// Shockwave maximum radius before it dissipates.
pub const SHOCKWAVE_MAX_RADIUS: f32 = 12.0;
/// Radial thickness of the shockwave ring collider.
pub const SHOCKWAVE_THICKNESS: f32 = 1.6;
/// Delay between the hand slam landing and the shockwave starting.
pub const SHOCKWAVE_DELAY: f32 = 0.15;

/// Exponential damping rate applied to knockback velocity (per second).
pub const KNOCKBACK_DAMPING: f32 = 6.0;

/// Bow target cone: minimum dot(forward, to_target) for a candidate.
pub const BOW_AIM_DOT_MIN: f32 = 0.95;
/// Bow maximum target distance.
pub const BOW_RANGE: f32 = 60.0;

/// Wand projectile flight speed.
pub const WAND_PROJECTILE_SPEED: f32 = 24.0;
/// Wand projectile lifetime in seconds.
pub const WAND_PROJECTILE_LIFETIME: f32 = 3.0;
/// Wand auto-lock acquisition range.
pub const WAND_LOCK_RANGE: f32 = 40.0;
/// Wand auto-lock cone half-angle in degrees.
pub const WAND_AIM_CONE_DEG: f32 = 25.0;
/// Homing turn rate in radians per second.
pub const WAND_HOMING_RATE: f32 = 3.0;
