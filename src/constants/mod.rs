//! Tuning constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.

mod animation;
mod combat;
mod enemies;
mod projectiles;

// Re-export all constants at the module level
pub use animation::*;
pub use combat::*;
pub use enemies::*;
pub use projectiles::*;

/// Largest delta time a single tick is allowed to see (seconds).
/// Protects integration and clip timing from frame hitches.
pub const MAX_TICK_DT: f32 = 0.1;
