//! Creature controller tuning constants.

/// Maximum distance from the player for creature updates to run.
/// Creatures further than this keep their last state untouched.
pub const AI_ACTIVE_RADIUS: f32 = 90.0;

/// Seconds a dead creature lingers while fading before despawn.
pub const DEATH_FADE_DURATION: f32 = 2.5;

/// Maximum turn rate while facing a target (radians/s).
pub const TURN_RATE: f32 = 6.0;
/// Smoothing rate for terrain-height snapping (per second).
pub const TERRAIN_SNAP_RATE: f32 = 10.0;

// BRAWLER
/// Brawler health
pub const BRAWLER_HEALTH: i32 = 60;
/// Brawler XP reward
pub const BRAWLER_XP: u32 = 25;
/// Brawler movement speed (units/s)
pub const BRAWLER_SPEED: f32 = 4.5;
/// Distance at which the brawler notices the player
pub const BRAWLER_AGGRO_RANGE: f32 = 30.0;
/// Distance inside which the brawler commits to an attack
pub const BRAWLER_ATTACK_RANGE: f32 = 3.2;
/// Distance below which the brawler backs off during hunt
pub const BRAWLER_TOO_CLOSE: f32 = 1.6;
/// Fixed windup face-lock before the swing commits (seconds)
pub const BRAWLER_WINDUP: f32 = 0.45;
/// Inter-attack cooldown enforced in the recover state
pub const BRAWLER_COOLDOWN: f32 = 1.4;
/// Swing clip fraction window during which the lunge displaces the brawler
pub const BRAWLER_LUNGE_START: f32 = 0.1;
pub const BRAWLER_LUNGE_END: f32 = 0.35;
/// Cap on lunge displacement speed (units/s)
pub const BRAWLER_MAX_LUNGE_SPEED: f32 = 9.0;
/// Swing clip fraction at which the single hit test fires
pub const BRAWLER_HIT_FRACTION: f32 = 0.5;
/// Brawler melee reach and full arc
pub const BRAWLER_REACH: f32 = 3.6;
pub const BRAWLER_ARC_DEG: f32 = 100.0;
/// Brawler attack damage
pub const BRAWLER_DAMAGE: i32 = 12;
/// Damage multiplier applied when the defender is blocking
pub const BLOCK_DAMAGE_MULT: f32 = 0.35;
/// Knockback impulse magnitude on a landed brawler hit
pub const BRAWLER_KNOCKBACK: f32 = 6.0;
/// Seconds between circle-strafe direction flips
pub const BRAWLER_STRAFE_FLIP_INTERVAL: f32 = 2.2;
/// Minimum duration of the mandatory back-off once triggered
pub const BRAWLER_BACKOFF_DURATION: f32 = 0.6;
/// Fallback swing duration when the attack clip is missing (seconds)
pub const BRAWLER_SWING_FALLBACK: f32 = 0.8;

// SKIRMISHER
/// Skirmisher health
pub const SKIRMISHER_HEALTH: i32 = 40;
/// Skirmisher XP reward
pub const SKIRMISHER_XP: u32 = 20;
/// Skirmisher movement speed (units/s)
pub const SKIRMISHER_SPEED: f32 = 5.0;
/// Distance at which the skirmisher engages
pub const SKIRMISHER_AGGRO_RANGE: f32 = 45.0;
/// Inside this distance the skirmisher flees
pub const SKIRMISHER_KEEP_OUT: f32 = 10.0;
/// Beyond this distance the skirmisher approaches
pub const SKIRMISHER_APPROACH: f32 = 25.0;
/// Hysteresis band around both distance thresholds
pub const SKIRMISHER_HYSTERESIS: f32 = 2.0;
/// Seconds between shots
pub const SKIRMISHER_SHOT_COOLDOWN: f32 = 2.0;
/// Shoot clip fraction at which the arrow is released
pub const SKIRMISHER_FIRE_FRACTION: f32 = 0.6;
/// Arrow speed handed to the projectile-spawn callback
pub const SKIRMISHER_ARROW_SPEED: f32 = 30.0;
/// Muzzle forward offset fallback when the bone is unresolvable
pub const SKIRMISHER_MUZZLE_FALLBACK: f32 = 0.8;
/// Muzzle height used by the fallback offset
pub const SKIRMISHER_MUZZLE_HEIGHT: f32 = 1.4;

// BOSS
/// Boss health
pub const BOSS_HEALTH: i32 = 300;
/// Boss XP reward
pub const BOSS_XP: u32 = 500;
/// Boss engage range (dispatches the engage notification once)
pub const BOSS_ENGAGE_RANGE: f32 = 40.0;
/// Boss ground movement speed
pub const BOSS_SPEED: f32 = 3.0;
/// Boss flight altitude above terrain during air assault
pub const BOSS_FLIGHT_ALTITUDE: f32 = 12.0;
/// Takeoff / landing vertical speed
pub const BOSS_CLIMB_RATE: f32 = 6.0;
/// Orbit standoff radius during air assault
pub const BOSS_ORBIT_RADIUS: f32 = 18.0;
/// Tangential orbit speed
pub const BOSS_ORBIT_SPEED: f32 = 8.0;
/// Corrective radial gain pulling the orbit toward the standoff radius
pub const BOSS_ORBIT_RADIAL_GAIN: f32 = 1.5;
/// Ground fire phase duration (seconds)
pub const BOSS_GROUND_FIRE_DURATION: f32 = 6.0;
/// Air assault ends after this long even if bursts remain
pub const BOSS_AIR_TIMEOUT: f32 = 14.0;
/// Number of fire bursts per air assault
pub const BOSS_AIR_BURSTS: u32 = 3;
/// Burst length and pause between bursts (seconds)
pub const BOSS_BURST_DURATION: f32 = 2.0;
pub const BOSS_BURST_PAUSE: f32 = 1.5;
/// Fire cone half-angle in degrees and reach
pub const BOSS_FIRE_CONE_DEG: f32 = 30.0;
pub const BOSS_FIRE_RANGE: f32 = 22.0;
/// Fire envelope timings (seconds)
pub const BOSS_FIRE_WARMUP: f32 = 0.6;
pub const BOSS_FIRE_BURST: f32 = 0.4;
pub const BOSS_FIRE_WINDDOWN: f32 = 0.8;
/// Damage per second at full envelope intensity
pub const BOSS_FIRE_DPS: f32 = 18.0;
/// Capsule sample heights on the target (feet/chest/head)
pub const CAPSULE_SAMPLE_HEIGHTS: [f32; 3] = [0.1, 0.9, 1.7];

// WANDER (shared base)
/// Patrol wander speed as a fraction of the creature's speed
pub const WANDER_SPEED_FRACTION: f32 = 0.4;
/// Seconds between wander heading re-rolls
pub const WANDER_REROLL_INTERVAL: f32 = 3.0;
