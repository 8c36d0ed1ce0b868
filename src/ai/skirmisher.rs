//! Ranged skirmisher controller.
//!
//! `Patrol -> Engage`. Engagement runs three concentric distance bands with
//! hysteresis (flee / shoot / approach) so the creature never oscillates at
//! a boundary. Shots are cooldown-gated and released at the shoot clip's
//! fire-frame through an external projectile-spawn callback.

use glam::Vec3;
use rand::Rng;

use crate::animation::AnimationBlender;
use crate::clips::LoopMode;
use crate::components::Transform;
use crate::constants::*;
use crate::world::WorldContext;

use super::{move_planar, snap_to_terrain, turn_toward, PlayerSnapshot, WanderState};

/// Shoot clip name on the skirmisher rig.
pub const SKIRMISHER_SHOOT_CLIP: &str = "Shoot";

/// An arrow the controller wants spawned: origin, direction, speed.
pub type ArrowSpawn = (Vec3, Vec3, f32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkirmisherState {
    Patrol,
    Engage,
}

/// One in-flight shoot action.
#[derive(Debug, Clone, Copy)]
struct Shot {
    elapsed: f32,
    duration: f32,
    synced: bool,
    fired: bool,
}

#[derive(Debug)]
pub struct Skirmisher {
    pub state: SkirmisherState,
    /// Set while inside the flee band (with hysteresis).
    pub fleeing: bool,
    /// Set while beyond the approach band (with hysteresis).
    pub approaching: bool,
    cooldown_left: f32,
    shot: Option<Shot>,
    /// Local-space muzzle offset resolved from the attachment bone at
    /// spawn time; `None` falls back to a forward offset.
    muzzle_local: Option<Vec3>,
    wander: WanderState,
}

impl Skirmisher {
    pub fn new() -> Self {
        Self {
            state: SkirmisherState::Patrol,
            fleeing: false,
            approaching: false,
            cooldown_left: 0.0,
            shot: None,
            muzzle_local: None,
            wander: WanderState::default(),
        }
    }

    /// Record the muzzle offset for a resolved attachment bone.
    pub fn with_muzzle_bone(mut self, local_offset: Vec3) -> Self {
        self.muzzle_local = Some(local_offset);
        self
    }

    /// Muzzle world position: attachment bone when resolvable, else a
    /// forward offset fallback.
    fn muzzle(&self, tf: &Transform) -> Vec3 {
        match self.muzzle_local {
            Some(local) => {
                let forward = tf.forward();
                let right = Vec3::new(forward.z, 0.0, -forward.x);
                tf.pos + right * local.x + Vec3::Y * local.y + forward * local.z
            }
            None => {
                tf.pos
                    + tf.forward() * SKIRMISHER_MUZZLE_FALLBACK
                    + Vec3::Y * SKIRMISHER_MUZZLE_HEIGHT
            }
        }
    }

    /// Per-tick FSM update. A released arrow is handed to `spawn_arrow`.
    pub fn update(
        &mut self,
        tf: &mut Transform,
        blender: &mut AnimationBlender,
        ctx: &impl WorldContext,
        player: Option<PlayerSnapshot>,
        rng: &mut impl Rng,
        spawn_arrow: &mut dyn FnMut(Vec3, Vec3, f32),
        dt: f32,
    ) {
        self.cooldown_left = (self.cooldown_left - dt).max(0.0);
        snap_to_terrain(tf, ctx, dt);

        let Some(player) = player else {
            if self.state != SkirmisherState::Patrol {
                self.state = SkirmisherState::Patrol;
                self.fleeing = false;
                self.approaching = false;
                self.shot = None;
            }
            let speed = self.wander.update(tf, SKIRMISHER_SPEED, ctx, rng, dt);
            blender.set_locomotion(speed, false, false, false, false, false);
            return;
        };

        let dist = tf.planar_distance(player.pos);
        let mut speed = 0.0;
        let mut backing = false;

        match self.state {
            SkirmisherState::Patrol => {
                speed = self.wander.update(tf, SKIRMISHER_SPEED, ctx, rng, dt);
                if dist <= SKIRMISHER_AGGRO_RANGE {
                    self.state = SkirmisherState::Engage;
                }
            }
            SkirmisherState::Engage => {
                turn_toward(tf, player.pos, dt);

                // hysteresis bands: flags only flip past the buffered edges
                if dist < SKIRMISHER_KEEP_OUT - SKIRMISHER_HYSTERESIS {
                    self.fleeing = true;
                } else if dist > SKIRMISHER_KEEP_OUT + SKIRMISHER_HYSTERESIS {
                    self.fleeing = false;
                }
                if dist > SKIRMISHER_APPROACH + SKIRMISHER_HYSTERESIS {
                    self.approaching = true;
                } else if dist < SKIRMISHER_APPROACH - SKIRMISHER_HYSTERESIS {
                    self.approaching = false;
                }

                if self.fleeing {
                    let away = tf.pos - player.pos;
                    move_planar(tf, away, SKIRMISHER_SPEED, ctx, dt);
                    speed = SKIRMISHER_SPEED;
                    backing = true;
                } else if self.approaching {
                    let to = player.pos - tf.pos;
                    move_planar(tf, to, SKIRMISHER_SPEED, ctx, dt);
                    speed = SKIRMISHER_SPEED;
                } else {
                    // hold the shoot band and fire when ready
                    if self.shot.is_none() && self.cooldown_left <= 0.0 {
                        self.start_shot(blender);
                    }
                }

                self.advance_shot(tf, blender, &player, spawn_arrow, dt);

                if dist > SKIRMISHER_AGGRO_RANGE * 1.5 {
                    self.state = SkirmisherState::Patrol;
                }
            }
        }

        blender.set_locomotion(speed, false, false, false, backing, false);
    }

    fn start_shot(&mut self, blender: &mut AnimationBlender) {
        let synced = blender.play_overlay(SKIRMISHER_SHOOT_CLIP, LoopMode::Once);
        let duration = blender
            .clip_duration(SKIRMISHER_SHOOT_CLIP)
            .unwrap_or(SKIRMISHER_SHOT_COOLDOWN * 0.5);
        self.cooldown_left = SKIRMISHER_SHOT_COOLDOWN;
        self.shot = Some(Shot {
            elapsed: 0.0,
            duration,
            synced,
            fired: false,
        });
    }

    fn advance_shot(
        &mut self,
        tf: &Transform,
        blender: &AnimationBlender,
        player: &PlayerSnapshot,
        spawn_arrow: &mut dyn FnMut(Vec3, Vec3, f32),
        dt: f32,
    ) {
        let Some(shot) = &self.shot else {
            return;
        };
        let p = if !shot.synced {
            1.0
        } else if blender.is_overlay_active(SKIRMISHER_SHOOT_CLIP) {
            blender.overlay_elapsed_fraction()
        } else {
            (shot.elapsed / shot.duration).clamp(0.0, 1.0)
        };
        let release = !shot.fired && p >= SKIRMISHER_FIRE_FRACTION;

        if release {
            let origin = self.muzzle(tf);
            let target = player.pos + Vec3::Y * 0.9;
            let dir = (target - origin).normalize_or_zero();
            spawn_arrow(origin, dir, SKIRMISHER_ARROW_SPEED);
        }

        let Some(shot) = self.shot.as_mut() else {
            return;
        };
        if release {
            shot.fired = true;
        }
        shot.elapsed += dt;
        if !shot.synced || shot.elapsed >= shot.duration {
            self.shot = None;
        }
    }
}

impl Default for Skirmisher {
    fn default() -> Self {
        Self::new()
    }
}
