//! Game event system for decoupled communication between systems.
//!
//! Combat systems emit events, consumers (UI, telemetry, audio) drain them
//! at end of frame. Emitters never block on consumers.

use glam::Vec3;
use hecs::Entity;

/// Events emitted by the combat subsystem during a tick.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// A melee swing or shockwave connected with a target
    AttackHit {
        attacker: Entity,
        target: Entity,
        damage: i32,
    },
    /// An expanding shockwave ring passed over a target
    ShockwaveHit {
        attacker: Entity,
        target: Entity,
        damage: i32,
    },
    /// A pooled projectile connected with a target
    ProjectileHit {
        target: Entity,
        position: Vec3,
        damage: i32,
    },
    /// An enemy died; carries the XP award for the killer
    EnemyKilled {
        entity: Entity,
        xp: u32,
    },
    /// A skirmisher released an arrow (mirrors the spawn callback)
    ArrowRequested {
        shooter: Entity,
        origin: Vec3,
        dir: Vec3,
        speed: f32,
    },
    /// The boss noticed the player for the first time
    BossEngaged {
        entity: Entity,
        name: &'static str,
        current: i32,
        max: i32,
    },
    /// Boss health changed (fired exactly once per change)
    BossUpdated {
        entity: Entity,
        current: i32,
        max: i32,
    },
    /// Boss health reached zero (fired exactly once)
    BossDisengaged {
        entity: Entity,
    },
}

/// Simple event queue - events are pushed during update, processed at end of frame
#[derive(Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
