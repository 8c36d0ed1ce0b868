//! Creature registry: spawning, the per-tick update driver, and the
//! death/fade lifecycle.
//!
//! The `hecs::World` is the single owning registry; creature handles are
//! generation-checked `Entity` ids, so a stale reference simply fails
//! lookup. Iteration during update is read-mostly; spawns and despawns are
//! collected and applied outside the iteration pass.
//!
//! Tick ordering: each creature's FSM updates before its own animation
//! blend, and death/fade bookkeeping runs after all FSM updates.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;

use crate::ai::{Boss, Brawler, PlayerHit, PlayerSnapshot, Skirmisher};
use crate::animation::AnimationBlender;
use crate::clips::ClipLibrary;
use crate::components::{
    Blocking, BodyRadius, DeathFade, EnemyTag, Health, Player, Transform, Velocity,
};
use crate::constants::*;
use crate::events::{EventQueue, GameEvent};
use crate::world::WorldContext;

/// Spawn the player actor.
pub fn spawn_player(world: &mut World, pos: Vec3, clips: ClipLibrary) -> Entity {
    world.spawn((
        Transform::new(pos, 0.0),
        Velocity::default(),
        Health::new(100),
        Blocking(false),
        BodyRadius(0.5),
        Player,
        AnimationBlender::new(clips),
    ))
}

/// Spawn a melee brawler.
pub fn spawn_brawler(world: &mut World, pos: Vec3, clips: ClipLibrary) -> Entity {
    world.spawn((
        Transform::new(pos, 0.0),
        Velocity::default(),
        Health::new(BRAWLER_HEALTH),
        BodyRadius(0.6),
        EnemyTag::new(BRAWLER_XP),
        Brawler::new(),
        AnimationBlender::new(clips),
    ))
}

/// Spawn a ranged skirmisher.
pub fn spawn_skirmisher(world: &mut World, pos: Vec3, clips: ClipLibrary) -> Entity {
    world.spawn((
        Transform::new(pos, 0.0),
        Velocity::default(),
        Health::new(SKIRMISHER_HEALTH),
        BodyRadius(0.5),
        EnemyTag::new(SKIRMISHER_XP),
        Skirmisher::new(),
        AnimationBlender::new(clips),
    ))
}

/// Spawn the flying boss.
pub fn spawn_boss(world: &mut World, pos: Vec3, clips: ClipLibrary) -> Entity {
    world.spawn((
        Transform::new(pos, 0.0),
        Velocity::default(),
        Health::new(BOSS_HEALTH),
        BodyRadius(1.8),
        EnemyTag::new(BOSS_XP),
        Boss::new(BOSS_HEALTH),
        AnimationBlender::new(clips),
    ))
}

/// Player view taken once at the start of the tick.
fn snapshot_player(world: &World) -> Option<(Entity, PlayerSnapshot)> {
    world
        .query::<(&Transform, &Blocking, &Player)>()
        .iter()
        .next()
        .map(|(id, (tf, blocking, _))| {
            (
                id,
                PlayerSnapshot {
                    pos: tf.pos,
                    blocking: blocking.0,
                },
            )
        })
}

fn culled(player_pos: Option<Vec3>, tf: &Transform) -> bool {
    player_pos.map_or(false, |p| tf.planar_distance(p) > AI_ACTIVE_RADIUS)
}

/// Advance every live creature one tick.
///
/// Arrows released by skirmishers are handed to `spawn_arrow`; the caller
/// owns the enemy projectile pool.
pub fn update_creatures(
    world: &mut World,
    ctx: &impl WorldContext,
    events: &mut EventQueue,
    rng: &mut impl Rng,
    spawn_arrow: &mut dyn FnMut(Vec3, Vec3, f32),
    dt: f32,
) {
    puffin::profile_function!();
    let dt = dt.min(MAX_TICK_DT);

    let player = snapshot_player(world);
    let snap = player.map(|(_, s)| s);
    let player_pos = snap.map(|s| s.pos);

    let mut player_hits: Vec<PlayerHit> = Vec::new();

    for (_id, (brawler, tf, blender, health)) in
        world.query_mut::<(&mut Brawler, &mut Transform, &mut AnimationBlender, &Health)>()
    {
        if health.is_dead() || culled(player_pos, tf) {
            continue;
        }
        if let Some(hit) = brawler.update(tf, blender, ctx, snap, rng, dt) {
            player_hits.push(hit);
        }
        blender.update(dt);
    }

    for (id, (skirmisher, tf, blender, health)) in
        world.query_mut::<(&mut Skirmisher, &mut Transform, &mut AnimationBlender, &Health)>()
    {
        if health.is_dead() || culled(player_pos, tf) {
            continue;
        }
        let mut spawn = |origin: Vec3, dir: Vec3, speed: f32| {
            spawn_arrow(origin, dir, speed);
            events.push(GameEvent::ArrowRequested {
                shooter: id,
                origin,
                dir,
                speed,
            });
        };
        skirmisher.update(tf, blender, ctx, snap, rng, &mut spawn, dt);
        blender.update(dt);
    }

    for (id, (boss, tf, blender, health)) in
        world.query_mut::<(&mut Boss, &mut Transform, &mut AnimationBlender, &Health)>()
    {
        if culled(player_pos, tf) {
            continue;
        }
        // dead bosses still get one update so the disengage dispatches
        if let Some(hit) = boss.update(id, tf, blender, ctx, health, snap, events, dt) {
            player_hits.push(hit);
        }
        blender.update(dt);
    }

    if let Some((player_entity, _)) = player {
        apply_player_hits(world, player_entity, &player_hits, dt);
    }

    process_deaths(world, events, dt);
}

/// Apply accumulated creature hits to the player, then integrate and damp
/// the knockback velocity.
fn apply_player_hits(world: &mut World, player: Entity, hits: &[PlayerHit], dt: f32) {
    for hit in hits {
        if let Ok(mut health) = world.get::<&mut Health>(player) {
            health.damage(hit.damage);
        }
        if let Ok(mut vel) = world.get::<&mut Velocity>(player) {
            vel.0 += hit.knockback;
        }
    }
    let vel = match world.get::<&mut Velocity>(player) {
        Ok(mut v) => {
            let out = v.0;
            let k = (KNOCKBACK_DAMPING * dt).min(1.0);
            v.0 = out - out * k;
            out
        }
        Err(_) => return,
    };
    if let Ok(mut tf) = world.get::<&mut Transform>(player) {
        tf.pos += vel * dt;
    }
}

/// Death bookkeeping: emit the kill event once, strip the controller, start
/// the fade, and despawn once the fade expires.
pub fn process_deaths(world: &mut World, events: &mut EventQueue, dt: f32) {
    let newly_dead: Vec<(Entity, u32)> = world
        .query::<(&Health, &EnemyTag, Option<&DeathFade>)>()
        .iter()
        .filter(|(_, (health, _, fade))| health.is_dead() && fade.is_none())
        .map(|(id, (_, tag, _))| (id, tag.xp_reward))
        .collect();

    for (id, xp) in newly_dead {
        events.push(GameEvent::EnemyKilled { entity: id, xp });
        // the corpse stops acting but keeps its pose while fading
        let _ = world.remove_one::<Brawler>(id);
        let _ = world.remove_one::<Skirmisher>(id);
        let _ = world.remove_one::<Boss>(id);
        let _ = world.insert_one(id, DeathFade::new(DEATH_FADE_DURATION));
    }

    let mut expired = Vec::new();
    for (id, fade) in world.query_mut::<&mut DeathFade>() {
        fade.remaining -= dt;
        if fade.remaining <= 0.0 {
            expired.push(id);
        }
    }
    for id in expired {
        let _ = world.despawn(id);
    }
}
