//! Player attack strategies.
//!
//! One strategy is active per equipped weapon. The set is closed: melee
//! (sword or hand), bow, and wand. Each variant advances its own cooldown
//! and fires its actual effect exactly once per activation at a clip-time
//! fraction polled from the actor's [`AnimationBlender`].
//!
//! Call order within a tick: `update` (hit application) runs before the
//! same actor's `AnimationBlender::update`, so logical and visual state
//! never diverge within a frame.

pub mod bow;
pub mod melee;
pub mod wand;

use std::collections::HashSet;

use hecs::{Entity, World};

use crate::animation::AnimationBlender;
use crate::config::WeaponConfig;
use crate::constants::MAX_TICK_DT;
use crate::events::EventQueue;

pub use bow::BowAttack;
pub use melee::{MeleeAttack, MeleeKind, Shockwave};
pub use wand::WandAttack;

/// Hit bookkeeping for one swing or shockwave: each target is hit at most
/// once per instance, regardless of how many update calls see it in range.
#[derive(Debug, Default, Clone)]
pub struct AttackInstance {
    hit: HashSet<Entity>,
}

impl AttackInstance {
    pub fn new() -> Self {
        Self {
            hit: HashSet::new(),
        }
    }

    /// Record a hit; returns false when this target was already hit.
    pub fn register(&mut self, target: Entity) -> bool {
        self.hit.insert(target)
    }

    pub fn count(&self) -> usize {
        self.hit.len()
    }
}

/// The active weapon's attack strategy.
#[derive(Debug)]
pub enum AttackStrategy {
    Melee(MeleeAttack),
    Bow(BowAttack),
    Wand(WandAttack),
}

impl AttackStrategy {
    /// Equip a sword: arc-sweep melee.
    pub fn equip_sword(config: WeaponConfig) -> Self {
        Self::Melee(MeleeAttack::new(MeleeKind::Sword, config))
    }

    /// Equip bare hands: arc-sweep melee whose special adds a shockwave.
    pub fn equip_hand(config: WeaponConfig) -> Self {
        Self::Melee(MeleeAttack::new(MeleeKind::Hand, config))
    }

    /// Equip a bow: instant best-aligned pick, no simulated travel.
    pub fn equip_bow(config: WeaponConfig) -> Self {
        Self::Bow(BowAttack::new(config))
    }

    /// Equip a wand: pooled homing projectiles.
    pub fn equip_wand(config: WeaponConfig) -> Self {
        Self::Wand(WandAttack::new(config))
    }

    /// Start the default action if the cooldown allows it.
    pub fn attack(&mut self, blender: &mut AnimationBlender) {
        match self {
            Self::Melee(m) => m.attack(blender),
            Self::Bow(b) => b.attack(blender),
            Self::Wand(w) => w.attack(blender),
        }
    }

    /// Start the special action where the variant has one.
    pub fn special_attack(&mut self, blender: &mut AnimationBlender) {
        match self {
            Self::Melee(m) => m.special_attack(blender),
            // bow and wand have no special; fall back to the default action
            Self::Bow(b) => b.attack(blender),
            Self::Wand(w) => w.attack(blender),
        }
    }

    /// Advance timers and fire effects at their clip fractions.
    pub fn update(
        &mut self,
        world: &mut World,
        attacker: Entity,
        blender: &AnimationBlender,
        events: &mut EventQueue,
        dt: f32,
    ) {
        // hitch frames must not let swept effects outrun their collision
        // bands (shockwave ring step vs. thickness)
        let dt = dt.min(MAX_TICK_DT);
        match self {
            Self::Melee(m) => m.update(world, attacker, blender, events, dt),
            Self::Bow(b) => b.update(world, attacker, blender, events, dt),
            Self::Wand(w) => w.update(world, attacker, blender, events, dt),
        }
    }

    /// Abort any in-flight effect and reset activation flags.
    pub fn cancel(&mut self, blender: &mut AnimationBlender) {
        match self {
            Self::Melee(m) => m.cancel(blender),
            Self::Bow(b) => b.cancel(blender),
            Self::Wand(w) => w.cancel(blender),
        }
    }
}
