//! Common enemy-set query helpers.
//!
//! Pure read-only queries shared by attack strategies and controllers.
//! All picks tolerate an empty or not-yet-populated registry.

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{EnemyTag, Health, Player, Transform};

/// All living enemies with their positions.
pub fn living_enemies(world: &World) -> Vec<(Entity, Vec3)> {
    world
        .query::<(&Transform, &Health, &EnemyTag)>()
        .iter()
        .filter(|(_, (_, health, _))| !health.is_dead())
        .map(|(id, (tf, _, _))| (id, tf.pos))
        .collect()
}

/// The player entity and its position, if one exists yet.
pub fn player_position(world: &World) -> Option<(Entity, Vec3)> {
    world
        .query::<(&Transform, &Player)>()
        .iter()
        .next()
        .map(|(id, (tf, _))| (id, tf.pos))
}

/// Whether a creature handle still refers to a living entity.
pub fn is_alive(world: &World, entity: Entity) -> bool {
    world
        .get::<&Health>(entity)
        .map(|h| !h.is_dead())
        .unwrap_or(false)
}

/// Position of an entity, if it still exists.
pub fn position_of(world: &World, entity: Entity) -> Option<Vec3> {
    world.get::<&Transform>(entity).ok().map(|tf| tf.pos)
}

/// Best enemy inside a forward cone, ranked by angular alignment.
///
/// `min_dot` is the cone edge: a candidate passes when
/// `dot(forward, normalize(to)) > min_dot` and it is within `range`.
pub fn best_enemy_in_cone(
    world: &World,
    origin: Vec3,
    forward: Vec3,
    range: f32,
    min_dot: f32,
) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;
    for (id, pos) in living_enemies(world) {
        let to = pos - origin;
        let dist = to.length();
        if dist > range || dist < 1e-4 {
            continue;
        }
        let dot = forward.dot(to / dist);
        if dot <= min_dot {
            continue;
        }
        if best.map_or(true, |(_, d)| dot > d) {
            best = Some((id, dot));
        }
    }
    best.map(|(id, _)| id)
}

/// All enemies passing a forward-cone + reach test.
///
/// The arc is the full sweep angle in degrees; a candidate passes when
/// `dot(forward, normalize(to)) > cos(arc/2)` and `distance <= reach`.
pub fn enemies_in_arc(
    world: &World,
    origin: Vec3,
    forward: Vec3,
    reach: f32,
    arc_deg: f32,
) -> Vec<Entity> {
    let min_dot = (arc_deg.to_radians() / 2.0).cos();
    living_enemies(world)
        .into_iter()
        .filter(|(_, pos)| {
            let to = *pos - origin;
            let dist = to.length();
            if dist > reach {
                return false;
            }
            if dist < 1e-4 {
                // standing inside the attacker always counts
                return true;
            }
            forward.dot(to / dist) > min_dot
        })
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::EnemyTag;

    fn spawn_enemy(world: &mut World, pos: Vec3) -> Entity {
        world.spawn((
            Transform::new(pos, 0.0),
            Health::new(10),
            EnemyTag::new(5),
        ))
    }

    #[test]
    fn test_dead_enemies_excluded() {
        let mut world = World::new();
        let e = spawn_enemy(&mut world, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(living_enemies(&world).len(), 1);
        world.get::<&mut Health>(e).unwrap().damage(100);
        assert!(living_enemies(&world).is_empty());
    }

    #[test]
    fn test_arc_test_symmetric_under_rotation() {
        // the same relative geometry must pass regardless of attacker yaw
        for yaw_deg in [0.0f32, 45.0, 90.0, 180.0, 270.0, 313.0] {
            let yaw = yaw_deg.to_radians();
            let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos());
            let mut world = World::new();
            // enemy 30 degrees off forward at distance 5
            let off = yaw + 30f32.to_radians();
            let pos = Vec3::new(off.sin(), 0.0, off.cos()) * 5.0;
            spawn_enemy(&mut world, pos);
            let hits = enemies_in_arc(&world, Vec3::ZERO, forward, 8.0, 120.0);
            assert_eq!(hits.len(), 1, "yaw {yaw_deg}");
            // and 70 degrees off must miss a 120 degree arc
            let mut world = World::new();
            let off = yaw + 70f32.to_radians();
            let pos = Vec3::new(off.sin(), 0.0, off.cos()) * 5.0;
            spawn_enemy(&mut world, pos);
            let hits = enemies_in_arc(&world, Vec3::ZERO, forward, 8.0, 120.0);
            assert!(hits.is_empty(), "yaw {yaw_deg}");
        }
    }

    #[test]
    fn test_best_in_cone_prefers_alignment_over_distance() {
        let mut world = World::new();
        let forward = Vec3::Z;
        // closer but 15 degrees off axis
        let off = 15f32.to_radians();
        spawn_enemy(&mut world, Vec3::new(off.sin(), 0.0, off.cos()) * 3.0);
        // further but dead ahead
        let aligned = spawn_enemy(&mut world, Vec3::new(0.0, 0.0, 20.0));
        let best = best_enemy_in_cone(&world, Vec3::ZERO, forward, 60.0, 0.95);
        assert_eq!(best, Some(aligned));
    }

    #[test]
    fn test_missing_player_is_none() {
        let world = World::new();
        assert!(player_position(&world).is_none());
    }

    #[test]
    fn test_stale_handle_fails_lookup() {
        let mut world = World::new();
        let e = spawn_enemy(&mut world, Vec3::new(1.0, 0.0, 0.0));
        assert!(is_alive(&world, e));
        assert_eq!(position_of(&world, e), Some(Vec3::new(1.0, 0.0, 0.0)));
        world.despawn(e).unwrap();
        assert!(!is_alive(&world, e));
        assert_eq!(position_of(&world, e), None);
    }
}
