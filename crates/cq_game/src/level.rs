use crate::entity::{PatrolAxis, PowerUpKind};
use crate::error::{read_json, LoadError};
use glam::Vec3;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Point> for Vec3 {
    fn from(point: Point) -> Self {
        Vec3::new(point.x, point.y, point.z)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct FogSpec {
    pub color: u32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelPack {
    pub version: String,
    pub levels: Vec<LevelDescriptor>,
}

/// Immutable level template. Loading a level instantiates fresh entities from it.
#[derive(Debug, Deserialize, Clone)]
pub struct LevelDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_sky_color")]
    pub sky_color: u32,
    #[serde(default)]
    pub fog: Option<FogSpec>,
    #[serde(default = "default_ground_color")]
    pub ground_color: u32,
    #[serde(default = "default_start_karina")]
    pub start_karina: Point,
    #[serde(default = "default_start_kelsey")]
    pub start_kelsey: Point,
    #[serde(default)]
    pub platforms: Vec<PlatformSpec>,
    #[serde(default)]
    pub crystals: Vec<Point>,
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    #[serde(default)]
    pub power_ups: Vec<PowerUpSpec>,
    #[serde(default)]
    pub teleporter_pairs: Vec<[Point; 2]>,
    #[serde(default)]
    pub boss: Option<Point>,
}

impl LevelDescriptor {
    pub fn is_boss_level(&self) -> bool {
        self.boss.is_some()
    }

    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Level {}", index + 1))
    }
}

/// Missing coordinates are 0, a missing `height` is 0.5 and a missing
/// `depth` matches `width`.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PlatformSpec {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default = "default_platform_width")]
    pub width: f32,
    #[serde(default = "default_platform_height")]
    pub height: f32,
    #[serde(default)]
    pub depth: Option<f32>,
    /// Cylinder of diameter `width` instead of a box.
    #[serde(default)]
    pub circular: bool,
}

impl PlatformSpec {
    pub fn depth(&self) -> f32 {
        self.depth.unwrap_or(self.width)
    }

    fn is_solid(&self) -> bool {
        [self.width, self.height, self.depth()]
            .iter()
            .all(|size| size.is_finite() && *size > 0.0)
    }
}

/// A stationary enemy on the x axis unless told otherwise.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(default)]
pub struct EnemySpec {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub patrol_axis: PatrolAxis,
    pub patrol_range: f32,
    /// Units per second.
    pub speed: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PowerUpSpec {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default)]
    pub kind: Option<PowerUpKind>,
}

pub fn load_levels_from_path(path: &Path) -> Result<Vec<LevelDescriptor>, LoadError> {
    let mut pack: LevelPack = read_json(path)?;
    sanitize_levels(&mut pack.levels)?;
    log::info!(
        "Loaded level pack {} (version {}, {} levels)",
        path.display(),
        pack.version,
        pack.levels.len()
    );
    Ok(pack.levels)
}

/// Repair a freshly parsed pack in place.
///
/// Only an empty pack is an error. Degenerate entries are dropped or clamped
/// with a warning so the rest of the level still loads.
pub fn sanitize_levels(levels: &mut [LevelDescriptor]) -> Result<(), LoadError> {
    if levels.is_empty() {
        return Err(LoadError::invalid("level pack", "levels array is empty"));
    }

    for (index, level) in levels.iter_mut().enumerate() {
        let name = level.display_name(index);

        let before = level.platforms.len();
        level.platforms.retain(PlatformSpec::is_solid);
        if level.platforms.len() != before {
            log::warn!(
                "{name}: dropped {} platform(s) without a positive size",
                before - level.platforms.len()
            );
        }

        for (enemy_index, enemy) in level.enemies.iter_mut().enumerate() {
            if !(enemy.patrol_range >= 0.0 && enemy.speed >= 0.0) {
                log::warn!(
                    "{name}: enemy {enemy_index} has a bad patrol range or speed; it stands still"
                );
                enemy.patrol_range = 0.0;
                enemy.speed = 0.0;
            }
        }

        let before = level.teleporter_pairs.len();
        level.teleporter_pairs.retain(|[a, b]| a != b);
        if level.teleporter_pairs.len() != before {
            log::warn!("{name}: dropped teleporter pair(s) linking a pad to itself");
        }

        if let Some(fog) = level.fog {
            if !(fog.near >= 0.0 && fog.far > fog.near) {
                log::warn!("{name}: fog range must satisfy 0 <= near < far; fog disabled");
                level.fog = None;
            }
        }

        if level.crystals.is_empty() && !level.is_boss_level() {
            log::warn!("{name} has no crystals and no boss; it can never complete");
        }
    }
    Ok(())
}

const fn default_platform_width() -> f32 {
    1.0
}

const fn default_platform_height() -> f32 {
    0.5
}

const fn default_sky_color() -> u32 {
    0xcccccc
}

const fn default_ground_color() -> u32 {
    0x2e8b57
}

const fn default_start_karina() -> Point {
    Point::new(-2.0, 1.0, 0.0)
}

const fn default_start_kelsey() -> Point {
    Point::new(2.0, 1.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::test_support::{temp_file_path, write_file};
    use std::fs;

    #[test]
    fn load_levels_applies_defaults() {
        let path = temp_file_path("level", "defaults");
        write_file(
            &path,
            r#"{
              "version": "0.1",
              "levels": [
                { "crystals": [{ "x": 1.0, "y": 1.0, "z": -3.0 }] }
              ]
            }"#,
        );

        let levels = load_levels_from_path(&path).expect("minimal level should load");
        let level = &levels[0];
        assert_eq!(level.sky_color, 0xcccccc);
        assert_eq!(level.ground_color, 0x2e8b57);
        assert!(level.fog.is_none());
        assert_eq!(level.start_karina, Point::new(-2.0, 1.0, 0.0));
        assert_eq!(level.start_kelsey, Point::new(2.0, 1.0, 0.0));
        assert!(level.platforms.is_empty());
        assert!(!level.is_boss_level());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_levels_parses_full_descriptor() {
        let path = temp_file_path("level", "full");
        write_file(
            &path,
            r#"{
              "version": "0.1",
              "levels": [{
                "name": "Arena",
                "sky_color": 3355443,
                "fog": { "color": 34, "near": 5.0, "far": 25.0 },
                "platforms": [
                  { "x": 0, "y": 0, "z": 0, "width": 20, "height": 1, "depth": 20, "circular": true }
                ],
                "enemies": [
                  { "x": 0, "y": 2.5, "z": -4, "patrol_axis": "z", "patrol_range": 3.5, "speed": 1.8 }
                ],
                "power_ups": [{ "x": 1, "y": 1, "z": 1, "kind": "shield" }],
                "teleporter_pairs": [[{ "x": -3, "y": 2.1, "z": -4 }, { "x": 3, "y": 2.1, "z": -4 }]],
                "boss": { "x": 0, "y": 4, "z": -5 }
              }]
            }"#,
        );

        let levels = load_levels_from_path(&path).expect("full level should load");
        let level = &levels[0];
        assert_eq!(level.display_name(0), "Arena");
        assert!(level.platforms[0].circular);
        assert_eq!(level.enemies[0].patrol_axis, PatrolAxis::Z);
        assert_eq!(level.power_ups[0].kind, Some(PowerUpKind::Shield));
        assert_eq!(level.teleporter_pairs.len(), 1);
        assert!(level.is_boss_level());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_levels_rejects_empty_pack() {
        let path = temp_file_path("level", "empty");
        write_file(&path, r#"{ "version": "0.1", "levels": [] }"#);

        let err = load_levels_from_path(&path).expect_err("empty pack should fail");
        assert!(err.to_string().contains("levels array is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_levels_drops_degenerate_platforms() {
        let path = temp_file_path("level", "flat");
        write_file(
            &path,
            r#"{
              "version": "0.1",
              "levels": [{
                "platforms": [
                  { "x": 0, "y": 1, "z": 0, "width": 3, "height": 0, "depth": 3 },
                  { "x": 4, "y": 2, "z": -1, "width": 3 }
                ],
                "crystals": [{ "x": 0, "y": 2, "z": 0 }]
              }]
            }"#,
        );

        let levels = load_levels_from_path(&path).expect("pack should still load");
        let platforms = &levels[0].platforms;
        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].x, 4.0);
        assert_eq!(platforms[0].height, 0.5);
        assert_eq!(platforms[0].depth(), 3.0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_levels_repairs_partial_entities() {
        let path = temp_file_path("level", "partial");
        write_file(
            &path,
            r#"{
              "version": "0.1",
              "levels": [{
                "fog": { "color": 1, "near": 30.0, "far": 10.0 },
                "enemies": [
                  { "x": 2, "y": 0.5 },
                  { "x": -2, "y": 0.5, "patrol_axis": "z", "patrol_range": -3, "speed": 1.8 }
                ],
                "power_ups": [{ "x": 1 }],
                "teleporter_pairs": [[{ "x": 1, "y": 0, "z": 1 }, { "x": 1, "y": 0, "z": 1 }]],
                "crystals": [{ "x": 5 }]
              }]
            }"#,
        );

        let levels = load_levels_from_path(&path).expect("partial pack should load");
        let level = &levels[0];
        assert!(level.fog.is_none());
        assert_eq!(level.enemies.len(), 2);
        assert_eq!(level.enemies[0].patrol_axis, PatrolAxis::X);
        assert_eq!(level.enemies[0].speed, 0.0);
        assert_eq!(level.enemies[1].patrol_axis, PatrolAxis::Z);
        assert_eq!(level.enemies[1].patrol_range, 0.0);
        assert_eq!(level.enemies[1].speed, 0.0);
        assert_eq!(level.power_ups[0].y, 0.0);
        assert!(level.teleporter_pairs.is_empty());
        assert_eq!(level.crystals[0], Point::new(5.0, 0.0, 0.0));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_levels_reports_missing_file_as_io() {
        let path = temp_file_path("level", "missing");
        let err = load_levels_from_path(&path).expect_err("missing file should fail");
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn load_levels_reports_bad_json_as_parse() {
        let path = temp_file_path("level", "garbage");
        write_file(&path, "{ not json");
        let err = load_levels_from_path(&path).expect_err("garbage should fail");
        assert!(matches!(err, LoadError::Parse { .. }));
        let _ = fs::remove_file(path);
    }
}
