//! The built-in four-level campaign: three crystal hunts and the Guardian arena.

use crate::entity::PatrolAxis;
use crate::level::{EnemySpec, FogSpec, LevelDescriptor, PlatformSpec, Point, PowerUpSpec};

const fn slab(x: f32, y: f32, z: f32, width: f32, depth: f32) -> PlatformSpec {
    PlatformSpec {
        x,
        y,
        z,
        width,
        height: 0.5,
        depth: Some(depth),
        circular: false,
    }
}

const fn p(x: f32, y: f32, z: f32) -> Point {
    Point::new(x, y, z)
}

const fn patrol_x(x: f32, y: f32, z: f32, patrol_range: f32, speed: f32) -> EnemySpec {
    EnemySpec {
        x,
        y,
        z,
        patrol_axis: PatrolAxis::X,
        patrol_range,
        speed,
    }
}

fn power_ups(points: &[Point]) -> Vec<PowerUpSpec> {
    points
        .iter()
        .map(|point| PowerUpSpec {
            x: point.x,
            y: point.y,
            z: point.z,
            kind: None,
        })
        .collect()
}

pub fn builtin_levels() -> Vec<LevelDescriptor> {
    vec![meadow(), overcast(), night(), guardian_arena()]
}

fn meadow() -> LevelDescriptor {
    LevelDescriptor {
        name: Some("Meadow".to_string()),
        sky_color: 0x87ceeb,
        fog: Some(FogSpec {
            color: 0xaaaaaa,
            near: 15.0,
            far: 40.0,
        }),
        ground_color: 0x2e8b57,
        start_karina: p(-2.0, 1.0, 0.0),
        start_kelsey: p(2.0, 1.0, 0.0),
        platforms: vec![
            slab(-5.0, 2.0, -5.0, 3.0, 3.0),
            slab(0.0, 4.0, -8.0, 3.0, 3.0),
            slab(5.0, 6.0, -12.0, 3.0, 3.0),
            slab(10.0, 4.0, -8.0, 3.0, 3.0),
            slab(15.0, 2.0, -5.0, 3.0, 3.0),
            slab(-10.0, 3.0, -7.0, 3.0, 3.0),
            slab(-15.0, 5.0, -10.0, 3.0, 3.0),
        ],
        crystals: vec![
            p(-5.0, 3.0, -5.0),
            p(0.0, 5.0, -8.0),
            p(5.0, 7.0, -12.0),
            p(10.0, 5.0, -8.0),
            p(15.0, 3.0, -5.0),
            p(-10.0, 4.0, -7.0),
            p(-15.0, 6.0, -10.0),
        ],
        enemies: Vec::new(),
        power_ups: power_ups(&[p(0.0, 5.0, -8.0), p(-15.0, 6.0, -10.0)]),
        teleporter_pairs: vec![[p(-5.0, 2.1, -5.0), p(15.0, 2.1, -5.0)]],
        boss: None,
    }
}

fn overcast() -> LevelDescriptor {
    LevelDescriptor {
        name: Some("Overcast".to_string()),
        sky_color: 0xb0c4de,
        fog: Some(FogSpec {
            color: 0xbebebe,
            near: 20.0,
            far: 50.0,
        }),
        ground_color: 0x6a737b,
        start_karina: p(0.0, 1.0, 2.0),
        start_kelsey: p(0.0, 1.0, -2.0),
        platforms: vec![
            slab(0.0, 3.0, -5.0, 2.0, 2.0),
            slab(5.0, 5.0, -8.0, 2.0, 2.0),
            slab(-5.0, 5.0, -8.0, 2.0, 2.0),
            slab(0.0, 7.0, -12.0, 4.0, 1.0),
            slab(8.0, 8.0, -15.0, 2.0, 2.0),
            slab(-8.0, 8.0, -15.0, 2.0, 2.0),
            slab(0.0, 10.0, -18.0, 3.0, 3.0),
        ],
        crystals: vec![
            p(0.0, 4.0, -5.0),
            p(5.0, 6.0, -8.0),
            p(-5.0, 6.0, -8.0),
            p(0.0, 8.0, -12.0),
            p(8.0, 9.0, -15.0),
            p(-8.0, 9.0, -15.0),
            p(0.0, 11.0, -18.0),
        ],
        enemies: Vec::new(),
        power_ups: power_ups(&[p(-5.0, 6.0, -8.0), p(5.0, 6.0, -8.0), p(0.0, 11.0, -18.0)]),
        teleporter_pairs: vec![[p(-8.0, 8.1, -15.0), p(8.0, 8.1, -15.0)]],
        boss: None,
    }
}

fn night() -> LevelDescriptor {
    LevelDescriptor {
        name: Some("Night".to_string()),
        sky_color: 0x2c3e50,
        fog: Some(FogSpec {
            color: 0x1a2531,
            near: 10.0,
            far: 35.0,
        }),
        ground_color: 0x3d3d5c,
        start_karina: p(-1.0, 1.0, 0.0),
        start_kelsey: p(1.0, 1.0, 0.0),
        platforms: vec![
            slab(0.0, 2.0, -4.0, 8.0, 2.0),
            slab(-6.0, 4.0, -8.0, 3.0, 3.0),
            slab(6.0, 4.0, -8.0, 3.0, 3.0),
            slab(0.0, 6.0, -12.0, 10.0, 2.0),
            slab(-8.0, 8.0, -16.0, 3.0, 3.0),
            slab(8.0, 8.0, -16.0, 3.0, 3.0),
            slab(0.0, 10.0, -20.0, 4.0, 4.0),
        ],
        crystals: vec![
            p(-3.0, 3.0, -4.0),
            p(3.0, 3.0, -4.0),
            p(-6.0, 5.0, -8.0),
            p(6.0, 5.0, -8.0),
            p(-4.0, 7.0, -12.0),
            p(0.0, 7.0, -12.0),
            p(4.0, 7.0, -12.0),
            p(-8.0, 9.0, -16.0),
            p(8.0, 9.0, -16.0),
            p(0.0, 11.0, -20.0),
        ],
        enemies: vec![
            patrol_x(0.0, 2.5, -4.0, 3.5, 1.8),
            patrol_x(0.0, 6.5, -12.0, 4.5, 2.4),
            patrol_x(0.0, 10.5, -20.0, 1.5, 3.0),
        ],
        power_ups: power_ups(&[
            p(-6.0, 5.0, -8.0),
            p(6.0, 5.0, -8.0),
            p(-8.0, 9.0, -16.0),
            p(8.0, 9.0, -16.0),
        ]),
        teleporter_pairs: vec![
            [p(-3.0, 2.1, -4.0), p(3.0, 2.1, -4.0)],
            [p(-4.0, 6.1, -12.0), p(4.0, 6.1, -12.0)],
        ],
        boss: None,
    }
}

fn guardian_arena() -> LevelDescriptor {
    LevelDescriptor {
        name: Some("Guardian Arena".to_string()),
        sky_color: 0x000033,
        fog: Some(FogSpec {
            color: 0x000022,
            near: 5.0,
            far: 25.0,
        }),
        ground_color: 0x220033,
        start_karina: p(0.0, 1.0, 10.0),
        start_kelsey: p(0.0, 1.0, 8.0),
        platforms: vec![
            PlatformSpec {
                x: 0.0,
                y: 0.0,
                z: 0.0,
                width: 20.0,
                height: 1.0,
                depth: None,
                circular: true,
            },
            slab(-8.0, 3.0, -8.0, 3.0, 3.0),
            slab(8.0, 3.0, -8.0, 3.0, 3.0),
            slab(0.0, 5.0, -12.0, 4.0, 2.0),
        ],
        crystals: vec![p(-8.0, 4.0, -8.0), p(8.0, 4.0, -8.0), p(0.0, 6.0, -12.0)],
        enemies: Vec::new(),
        power_ups: power_ups(&[p(-7.0, 3.5, -7.0), p(7.0, 3.5, -7.0)]),
        teleporter_pairs: Vec::new(),
        boss: Some(p(0.0, 4.0, -5.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::sanitize_levels;

    #[test]
    fn builtin_campaign_needs_no_repair() {
        let mut levels = builtin_levels();
        let counts: Vec<(usize, usize)> = levels
            .iter()
            .map(|level| (level.platforms.len(), level.teleporter_pairs.len()))
            .collect();
        sanitize_levels(&mut levels).expect("built-in campaign must load");
        assert_eq!(levels.len(), 4);
        let repaired: Vec<(usize, usize)> = levels
            .iter()
            .map(|level| (level.platforms.len(), level.teleporter_pairs.len()))
            .collect();
        assert_eq!(counts, repaired);
        assert!(levels.iter().all(|level| level.fog.is_some()));
    }

    #[test]
    fn only_the_last_level_has_a_boss() {
        let levels = builtin_levels();
        let bosses: Vec<bool> = levels.iter().map(LevelDescriptor::is_boss_level).collect();
        assert_eq!(bosses, vec![false, false, false, true]);
    }
}
