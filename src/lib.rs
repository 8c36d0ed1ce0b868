//! Real-time combat resolution and creature behavior.
//!
//! Creatures live in a [`hecs::World`]; handles are generation-checked
//! [`hecs::Entity`] ids, so stale references fail lookup instead of aliasing
//! a reused slot. [`registry::update_creatures`] drives one tick: the player
//! is snapshotted once, each creature's FSM runs before its own animation
//! blend, accumulated hits land on the player after iteration, and death
//! bookkeeping runs last. The tick delta is clamped to
//! [`constants::MAX_TICK_DT`] so a long frame never teleports anything.
//!
//! Attacks are timed off animation clip progress, polled each tick rather
//! than driven by callbacks. A rig missing the expected clip degrades to an
//! immediate effect instead of stalling a state machine.

pub mod ai;
pub mod animation;
pub mod attack;
pub mod clips;
pub mod components;
pub mod config;
pub mod constants;
pub mod events;
pub mod projectile;
pub mod queries;
pub mod registry;
pub mod world;

pub use animation::{AnimationBlender, Channel};
pub use attack::AttackStrategy;
pub use clips::{ClipLibrary, LoopMode};
pub use events::{EventQueue, GameEvent};
pub use registry::{spawn_boss, spawn_brawler, spawn_player, spawn_skirmisher, update_creatures};
pub use world::{FlatWorld, Obstacle, WorldContext};
