//! Projectile pool constants.

/// Number of pooled projectile slots allocated at startup.
pub const PROJECTILE_POOL_SIZE: usize = 32;
/// Projectile collision radius (world units).
pub const PROJECTILE_RADIUS: f32 = 0.35;
/// Maximum samples kept in a projectile's trail ring buffer.
pub const TRAIL_CAPACITY: usize = 16;
/// Squared segment length below which the swept test degenerates
/// to a point-distance check.
pub const SWEEP_DEGENERATE_EPS: f32 = 1e-8;
