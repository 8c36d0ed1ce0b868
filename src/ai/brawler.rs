//! Melee brawler controller.
//!
//! `Patrol -> Hunt -> Windup -> Attack -> Recover -> Hunt`. Hunting mixes
//! approach with circle-strafe and a short mandatory back-off when too
//! close. The attack phase is synchronized to clip-time fractions: an early
//! lunge window displaces the brawler toward the target (speed capped), and
//! a single hit test fires at a later fraction.

use glam::Vec3;
use rand::Rng;

use crate::animation::AnimationBlender;
use crate::clips::LoopMode;
use crate::components::Transform;
use crate::constants::*;
use crate::world::WorldContext;

use super::{move_planar, snap_to_terrain, turn_toward, PlayerHit, PlayerSnapshot, WanderState};

/// Attack clip name on the brawler rig.
pub const BRAWLER_ATTACK_CLIP: &str = "Punch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrawlerState {
    Patrol,
    Hunt,
    Windup,
    Attack,
    Recover,
}

/// One committed swing.
#[derive(Debug, Clone, Copy)]
struct Swing {
    elapsed: f32,
    duration: f32,
    synced: bool,
    fired: bool,
    lunge_done: bool,
}

#[derive(Debug)]
pub struct Brawler {
    pub state: BrawlerState,
    cooldown_left: f32,
    windup_left: f32,
    swing: Option<Swing>,
    strafe_dir: f32,
    strafe_left: f32,
    backoff_left: f32,
    wander: WanderState,
}

impl Brawler {
    pub fn new() -> Self {
        Self {
            state: BrawlerState::Patrol,
            cooldown_left: 0.0,
            windup_left: 0.0,
            swing: None,
            strafe_dir: 1.0,
            strafe_left: BRAWLER_STRAFE_FLIP_INTERVAL,
            backoff_left: 0.0,
            wander: WanderState::default(),
        }
    }

    /// Per-tick FSM update. Returns damage/knockback to apply to the player.
    pub fn update(
        &mut self,
        tf: &mut Transform,
        blender: &mut AnimationBlender,
        ctx: &impl WorldContext,
        player: Option<PlayerSnapshot>,
        rng: &mut impl Rng,
        dt: f32,
    ) -> Option<PlayerHit> {
        self.cooldown_left = (self.cooldown_left - dt).max(0.0);
        snap_to_terrain(tf, ctx, dt);

        // a lost target reference always drops back to patrol
        let Some(player) = player else {
            if self.state != BrawlerState::Patrol {
                self.state = BrawlerState::Patrol;
                self.swing = None;
            }
            let speed = self.wander.update(tf, BRAWLER_SPEED, ctx, rng, dt);
            blender.set_locomotion(speed, false, false, false, false, false);
            return None;
        };

        let mut hit = None;
        let mut speed = 0.0;
        let mut backing = false;
        let dist = tf.planar_distance(player.pos);

        match self.state {
            BrawlerState::Patrol => {
                speed = self.wander.update(tf, BRAWLER_SPEED, ctx, rng, dt);
                if dist <= BRAWLER_AGGRO_RANGE {
                    self.state = BrawlerState::Hunt;
                }
            }
            BrawlerState::Hunt => {
                turn_toward(tf, player.pos, dt);
                if self.backoff_left > 0.0 {
                    // mandatory back-off, straight away from the player
                    self.backoff_left -= dt;
                    let away = tf.pos - player.pos;
                    move_planar(tf, away, BRAWLER_SPEED, ctx, dt);
                    speed = BRAWLER_SPEED;
                    backing = true;
                } else if dist < BRAWLER_TOO_CLOSE {
                    self.backoff_left = BRAWLER_BACKOFF_DURATION;
                } else if dist <= BRAWLER_ATTACK_RANGE && self.cooldown_left <= 0.0 {
                    self.state = BrawlerState::Windup;
                    self.windup_left = BRAWLER_WINDUP;
                } else if dist > BRAWLER_AGGRO_RANGE * 1.5 {
                    self.state = BrawlerState::Patrol;
                } else {
                    // approach with a tangential strafe component
                    self.strafe_left -= dt;
                    if self.strafe_left <= 0.0 {
                        self.strafe_dir = -self.strafe_dir;
                        self.strafe_left =
                            BRAWLER_STRAFE_FLIP_INTERVAL * rng.gen_range(0.7..1.3);
                    }
                    let to = (player.pos - tf.pos) * Vec3::new(1.0, 0.0, 1.0);
                    let toward = to.normalize_or_zero();
                    let tangent = Vec3::new(-toward.z, 0.0, toward.x) * self.strafe_dir;
                    let blend = if dist > BRAWLER_ATTACK_RANGE * 2.0 {
                        0.2
                    } else {
                        0.7
                    };
                    let dir = (toward * (1.0 - blend) + tangent * blend).normalize_or_zero();
                    move_planar(tf, dir, BRAWLER_SPEED, ctx, dt);
                    speed = BRAWLER_SPEED;
                }
            }
            BrawlerState::Windup => {
                // face-lock before committing
                turn_toward(tf, player.pos, dt);
                self.windup_left -= dt;
                if self.windup_left <= 0.0 {
                    self.start_swing(blender);
                }
            }
            BrawlerState::Attack => {
                hit = self.update_swing(tf, blender, ctx, &player, dt);
            }
            BrawlerState::Recover => {
                turn_toward(tf, player.pos, dt);
                if self.cooldown_left <= 0.0 {
                    self.state = BrawlerState::Hunt;
                }
            }
        }

        blender.set_locomotion(speed, false, false, false, backing, false);
        hit
    }

    fn start_swing(&mut self, blender: &mut AnimationBlender) {
        let synced = blender.play_overlay(BRAWLER_ATTACK_CLIP, LoopMode::Once);
        let duration = blender
            .clip_duration(BRAWLER_ATTACK_CLIP)
            .unwrap_or(BRAWLER_SWING_FALLBACK);
        self.swing = Some(Swing {
            elapsed: 0.0,
            duration,
            synced,
            fired: false,
            lunge_done: false,
        });
        self.state = BrawlerState::Attack;
    }

    fn swing_progress(&self, blender: &AnimationBlender) -> f32 {
        let Some(swing) = &self.swing else {
            return 0.0;
        };
        if !swing.synced {
            return 1.0;
        }
        if blender.is_overlay_active(BRAWLER_ATTACK_CLIP) {
            blender.overlay_elapsed_fraction()
        } else {
            (swing.elapsed / swing.duration).clamp(0.0, 1.0)
        }
    }

    fn update_swing(
        &mut self,
        tf: &mut Transform,
        blender: &AnimationBlender,
        ctx: &impl WorldContext,
        player: &PlayerSnapshot,
        dt: f32,
    ) -> Option<PlayerHit> {
        let p = self.swing_progress(blender);
        let mut out = None;

        // lunge window: scripted displacement toward the target, capped
        if p >= BRAWLER_LUNGE_START && p <= BRAWLER_LUNGE_END {
            let to = (player.pos - tf.pos) * Vec3::new(1.0, 0.0, 1.0);
            let dist = to.length();
            let gap = (dist - BRAWLER_TOO_CLOSE).max(0.0);
            let step = (BRAWLER_MAX_LUNGE_SPEED * dt).min(gap);
            if step > 1e-5 {
                move_planar(tf, to, step / dt, ctx, dt);
            }
        }

        let Some(swing) = self.swing.as_mut() else {
            self.state = BrawlerState::Recover;
            return out;
        };
        if !swing.fired && p >= BRAWLER_HIT_FRACTION {
            swing.fired = true;
            // forward cone + reach, single test per swing
            let to = player.pos - tf.pos;
            let dist = tf.planar_distance(player.pos);
            let in_arc = if dist < 1e-4 {
                true
            } else {
                let min_dot = (BRAWLER_ARC_DEG.to_radians() / 2.0).cos();
                tf.forward().dot((to * Vec3::new(1.0, 0.0, 1.0)).normalize_or_zero()) > min_dot
            };
            if dist <= BRAWLER_REACH && in_arc {
                let damage = if player.blocking {
                    ((BRAWLER_DAMAGE as f32) * BLOCK_DAMAGE_MULT).round() as i32
                } else {
                    BRAWLER_DAMAGE
                };
                let push = (to * Vec3::new(1.0, 0.0, 1.0)).normalize_or_zero()
                    * BRAWLER_KNOCKBACK;
                out = Some(PlayerHit {
                    damage,
                    knockback: push,
                });
            }
        }

        swing.elapsed += dt;
        let done = if swing.synced {
            swing.elapsed >= swing.duration
        } else {
            true
        };
        if done {
            self.swing = None;
            self.cooldown_left = BRAWLER_COOLDOWN;
            self.state = BrawlerState::Recover;
        }
        out
    }
}

impl Default for Brawler {
    fn default() -> Self {
        Self::new()
    }
}
