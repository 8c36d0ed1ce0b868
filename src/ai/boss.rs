//! Multi-phase flying boss controller.
//!
//! `Idle -> GroundFire -> Takeoff -> AirAssault -> Landing -> GroundFire`
//! loop. Fire phases drive a timed damage-over-time cone with a
//! warmup/burst/sustain/wind-down envelope, tested each tick against the
//! target's capsule approximation (feet/chest/head sample points). Boss
//! health notifications are one-shot per change.

use glam::Vec3;

use crate::animation::AnimationBlender;
use crate::clips::LoopMode;
use crate::components::{Health, Transform};
use crate::constants::*;
use crate::events::{EventQueue, GameEvent};
use crate::world::WorldContext;

use super::{turn_toward, PlayerHit, PlayerSnapshot};

/// Display name carried in the engage notification.
pub const BOSS_NAME: &str = "Cinder Drake";
/// Fire-breath clip name on the boss rig.
pub const BOSS_FIRE_CLIP: &str = "FireBreath";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossState {
    Idle,
    GroundFire,
    Takeoff,
    AirAssault,
    Landing,
}

/// Damage-over-time envelope for one fire activation.
#[derive(Debug, Clone, Copy)]
struct FireVolume {
    elapsed: f32,
    winding_down: bool,
    winddown_from: f32,
    winddown_elapsed: f32,
}

impl FireVolume {
    fn new() -> Self {
        Self {
            elapsed: 0.0,
            winding_down: false,
            winddown_from: 0.0,
            winddown_elapsed: 0.0,
        }
    }

    /// Envelope intensity in [0, 1]: warmup ramp, burst peak, sustain,
    /// then a wind-down ramp once `begin_winddown` is called.
    fn intensity(&self) -> f32 {
        if self.winding_down {
            let f = 1.0 - (self.winddown_elapsed / BOSS_FIRE_WINDDOWN).min(1.0);
            return self.winddown_from * f;
        }
        if self.elapsed < BOSS_FIRE_WARMUP {
            self.elapsed / BOSS_FIRE_WARMUP
        } else if self.elapsed < BOSS_FIRE_WARMUP + BOSS_FIRE_BURST {
            1.0
        } else {
            0.6
        }
    }

    fn begin_winddown(&mut self) {
        if !self.winding_down {
            self.winddown_from = self.intensity();
            self.winding_down = true;
            self.winddown_elapsed = 0.0;
        }
    }

    fn advance(&mut self, dt: f32) {
        if self.winding_down {
            self.winddown_elapsed += dt;
        } else {
            self.elapsed += dt;
        }
    }

    fn finished(&self) -> bool {
        self.winding_down && self.winddown_elapsed >= BOSS_FIRE_WINDDOWN
    }
}

#[derive(Debug)]
pub struct Boss {
    pub state: BossState,
    engaged: bool,
    disengaged: bool,
    last_health: i32,
    phase_left: f32,
    fire: Option<FireVolume>,
    air_elapsed: f32,
    bursts_done: u32,
    bursting: bool,
    burst_left: f32,
    orbit_dir: f32,
    /// Fractional DoT carry between ticks.
    damage_accum: f32,
}

impl Boss {
    pub fn new(max_health: i32) -> Self {
        Self {
            state: BossState::Idle,
            engaged: false,
            disengaged: false,
            last_health: max_health,
            phase_left: 0.0,
            fire: None,
            air_elapsed: 0.0,
            bursts_done: 0,
            bursting: false,
            burst_left: 0.0,
            orbit_dir: 1.0,
            damage_accum: 0.0,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Whether a point lies inside the fire cone from `apex` along `axis`.
    fn point_in_cone(apex: Vec3, axis: Vec3, point: Vec3) -> bool {
        let v = point - apex;
        let along = v.dot(axis);
        if along <= 0.0 || along > BOSS_FIRE_RANGE {
            return false;
        }
        let len = v.length();
        if len < 1e-4 {
            return true;
        }
        (v / len).dot(axis) >= BOSS_FIRE_CONE_DEG.to_radians().cos()
    }

    /// Capsule test: any of the target's feet/chest/head samples inside.
    fn capsule_in_cone(apex: Vec3, axis: Vec3, target_feet: Vec3) -> bool {
        CAPSULE_SAMPLE_HEIGHTS
            .iter()
            .any(|&h| Self::point_in_cone(apex, axis, target_feet + Vec3::Y * h))
    }

    fn mouth(tf: &Transform) -> Vec3 {
        tf.pos + Vec3::Y * 1.5
    }

    /// Per-tick FSM update. Returns DoT damage to apply to the player.
    pub fn update(
        &mut self,
        entity: hecs::Entity,
        tf: &mut Transform,
        blender: &mut AnimationBlender,
        ctx: &impl WorldContext,
        health: &Health,
        player: Option<PlayerSnapshot>,
        events: &mut EventQueue,
        dt: f32,
    ) -> Option<PlayerHit> {
        self.dispatch_health_notifications(entity, health, events);
        if self.disengaged {
            blender.set_locomotion(0.0, false, false, false, false, false);
            return None;
        }

        let flying = matches!(
            self.state,
            BossState::Takeoff | BossState::AirAssault | BossState::Landing
        );
        if !flying {
            super::snap_to_terrain(tf, ctx, dt);
        }

        let Some(player) = player else {
            // lost target: ground phases drop to idle, airborne phases land
            // first and idle once down
            match self.state {
                BossState::Takeoff | BossState::AirAssault => self.enter_landing(blender),
                BossState::Landing => {
                    let ground = ctx.terrain_height_at(tf.pos.x, tf.pos.z);
                    if Self::descend_step(tf, ground, dt) {
                        self.state = BossState::Idle;
                    }
                }
                BossState::GroundFire => {
                    self.state = BossState::Idle;
                    self.fire = None;
                    blender.stop_overlay();
                }
                BossState::Idle => {}
            }
            self.update_locomotion(blender, flying, 0.0);
            return None;
        };

        let mut hit = None;
        let mut speed = 0.0;

        match self.state {
            BossState::Idle => {
                if tf.planar_distance(player.pos) <= BOSS_ENGAGE_RANGE {
                    if !self.engaged {
                        self.engaged = true;
                        events.push(GameEvent::BossEngaged {
                            entity,
                            name: BOSS_NAME,
                            current: health.current,
                            max: health.max,
                        });
                    }
                    self.enter_ground_fire(blender);
                }
            }
            BossState::GroundFire => {
                turn_toward(tf, player.pos, dt);
                self.phase_left -= dt;
                if self.phase_left <= BOSS_FIRE_WINDDOWN {
                    if let Some(fire) = &mut self.fire {
                        fire.begin_winddown();
                    }
                }
                let axis = tf.forward();
                hit = self.apply_fire(Self::mouth(tf), axis, player.pos, dt);
                if self.phase_left <= 0.0 {
                    self.fire = None;
                    blender.stop_overlay();
                    self.state = BossState::Takeoff;
                }
            }
            BossState::Takeoff => {
                let target_y = ctx.terrain_height_at(tf.pos.x, tf.pos.z) + BOSS_FLIGHT_ALTITUDE;
                tf.pos.y += (BOSS_CLIMB_RATE * dt).min((target_y - tf.pos.y).max(0.0));
                if tf.pos.y >= target_y - 0.05 {
                    self.enter_air_assault();
                }
            }
            BossState::AirAssault => {
                self.air_elapsed += dt;
                speed = self.orbit(tf, ctx, player.pos, dt);
                turn_toward(tf, player.pos, dt);

                self.burst_left -= dt;
                if self.bursting {
                    let apex = Self::mouth(tf);
                    let axis = (player.pos + Vec3::Y * 0.9 - apex).normalize_or_zero();
                    hit = self.apply_fire(apex, axis, player.pos, dt);
                    if self.burst_left <= 0.0 {
                        self.bursting = false;
                        self.burst_left = BOSS_BURST_PAUSE;
                        self.bursts_done += 1;
                        self.fire = None;
                    }
                } else if self.burst_left <= 0.0 {
                    self.bursting = true;
                    self.burst_left = BOSS_BURST_DURATION;
                    self.fire = Some(FireVolume::new());
                }

                if self.air_elapsed >= BOSS_AIR_TIMEOUT || self.bursts_done >= BOSS_AIR_BURSTS {
                    self.enter_landing(blender);
                }
            }
            BossState::Landing => {
                let ground = ctx.terrain_height_at(tf.pos.x, tf.pos.z);
                if Self::descend_step(tf, ground, dt) {
                    self.enter_ground_fire(blender);
                }
            }
        }

        self.update_locomotion(blender, flying, speed);
        hit
    }

    fn enter_ground_fire(&mut self, blender: &mut AnimationBlender) {
        self.state = BossState::GroundFire;
        self.phase_left = BOSS_GROUND_FIRE_DURATION;
        self.fire = Some(FireVolume::new());
        if !blender.play_overlay(BOSS_FIRE_CLIP, LoopMode::Loop) {
            log::debug!("boss fire clip missing, breath runs unsynchronized");
        }
    }

    fn enter_air_assault(&mut self) {
        self.state = BossState::AirAssault;
        self.air_elapsed = 0.0;
        self.bursts_done = 0;
        self.bursting = true;
        self.burst_left = BOSS_BURST_DURATION;
        self.fire = Some(FireVolume::new());
        self.orbit_dir = -self.orbit_dir;
    }

    fn enter_landing(&mut self, blender: &mut AnimationBlender) {
        self.state = BossState::Landing;
        self.fire = None;
        blender.stop_overlay();
    }

    /// One landing descent step. Returns true once the boss touches ground.
    fn descend_step(tf: &mut Transform, ground: f32, dt: f32) -> bool {
        tf.pos.y -= (BOSS_CLIMB_RATE * dt).min((tf.pos.y - ground).max(0.0));
        if tf.pos.y <= ground + 0.05 {
            tf.pos.y = ground;
            return true;
        }
        false
    }

    /// Orbital motion around the target: tangential drive plus a corrective
    /// radial term pulling the orbit toward the standoff radius.
    fn orbit(&mut self, tf: &mut Transform, ctx: &impl WorldContext, target: Vec3, dt: f32) -> f32 {
        let radial = (tf.pos - target) * Vec3::new(1.0, 0.0, 1.0);
        let dist = radial.length().max(1e-3);
        let radial_unit = radial / dist;
        let tangent = Vec3::new(-radial_unit.z, 0.0, radial_unit.x) * self.orbit_dir;
        let correction = radial_unit * (BOSS_ORBIT_RADIUS - dist) * BOSS_ORBIT_RADIAL_GAIN;
        let vel = tangent * BOSS_ORBIT_SPEED + correction;
        tf.pos += vel * dt;
        // hold altitude over terrain
        let target_y = ctx.terrain_height_at(tf.pos.x, tf.pos.z) + BOSS_FLIGHT_ALTITUDE;
        tf.pos.y += (target_y - tf.pos.y).clamp(-BOSS_CLIMB_RATE * dt, BOSS_CLIMB_RATE * dt);
        vel.length()
    }

    /// Advance the fire envelope and apply cone DoT against the capsule.
    fn apply_fire(
        &mut self,
        apex: Vec3,
        axis: Vec3,
        target_feet: Vec3,
        dt: f32,
    ) -> Option<PlayerHit> {
        let fire = self.fire.as_mut()?;
        fire.advance(dt);
        let intensity = fire.intensity();
        if fire.finished() {
            self.fire = None;
            return None;
        }
        if intensity <= 0.0 || !Self::capsule_in_cone(apex, axis, target_feet) {
            return None;
        }
        self.damage_accum += BOSS_FIRE_DPS * intensity * dt;
        if self.damage_accum < 1.0 {
            return None;
        }
        let dmg = self.damage_accum.floor();
        self.damage_accum -= dmg;
        Some(PlayerHit {
            damage: dmg as i32,
            knockback: Vec3::ZERO,
        })
    }

    fn update_locomotion(&self, blender: &mut AnimationBlender, flying: bool, speed: f32) {
        blender.set_locomotion(speed, flying, false, false, false, false);
    }

    /// Boss health telemetry: one update per change, one disengage at zero,
    /// nothing after.
    fn dispatch_health_notifications(
        &mut self,
        entity: hecs::Entity,
        health: &Health,
        events: &mut EventQueue,
    ) {
        if self.disengaged || health.current == self.last_health {
            return;
        }
        if health.current <= 0 {
            events.push(GameEvent::BossDisengaged { entity });
            self.disengaged = true;
        } else {
            events.push(GameEvent::BossUpdated {
                entity,
                current: health.current,
                max: health.max,
            });
        }
        self.last_health = health.current;
    }
}
