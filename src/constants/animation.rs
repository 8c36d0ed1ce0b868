//! Animation blending constants.

/// How quickly blend weights chase their targets (per second).
/// The per-tick blend factor is `min(1, ANIM_RESPONSIVENESS * dt)`.
pub const ANIM_RESPONSIVENESS: f32 = 8.0;

/// Minimum allowed total blended weight (locomotion + overlay).
/// Below this the dominant target channel is boosted to avoid a no-pose frame.
pub const WEIGHT_FLOOR: f32 = 0.15;

/// Seconds before an overlay clip ends in which locomotion starts fading
/// back in, hiding the pop when the next action begins.
pub const OVERLAY_BACK_WINDOW: f32 = 0.25;

/// Speed (units/s) below which the idle channel is fully dominant.
pub const IDLE_SPEED_MAX: f32 = 0.3;
/// Walk channel is pinned to full weight inside this stable band.
pub const WALK_PLATEAU_MIN: f32 = 1.2;
pub const WALK_PLATEAU_MAX: f32 = 3.0;
/// Above this speed the run channel is pinned to full weight.
pub const RUN_SPEED_MIN: f32 = 5.0;
