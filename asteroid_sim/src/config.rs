// Asteroid size and layout configuration.
//
// Every constant that fixes the shape of an asteroid lives in
// `AsteroidConfig`: tile size, tile-group side length (G), level side length
// in groups (L), level count (D), spacing between levels, and how many
// branches the tunnel carve makes. The grid is always (G*L) x (G*L) cells per
// level and never changes size after construction.
//
// Configs are plain serde structs so they can be loaded from JSON.
// `from_json()` validates; hand-built configs should call `validate()` (the
// `Asteroid` constructor does).
//
// See also: `asteroid.rs` which owns the config, `generate.rs` which reads
// `tunnel_branch_count`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a config was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be at least 1")]
    ZeroDimension { field: &'static str },
    #[error("tile_size must be finite and positive, got {0}")]
    InvalidTileSize(f32),
    #[error("level_spacing must be finite, got {0}")]
    InvalidLevelSpacing(f32),
    #[error("{what} overflows addressable cells")]
    TooLarge { what: &'static str },
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shape and layout of an asteroid. Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsteroidConfig {
    /// Edge length of one tile in world units.
    pub tile_size: f32,
    /// Side length G of a tile group, in tiles. Groups are the unit of
    /// dirty tracking and batched redraw.
    pub tile_group_size: u32,
    /// Side length L of a level, in tile groups.
    pub level_size: u32,
    /// Number of levels D stacked along the world Y axis.
    pub num_levels: u32,
    /// World distance between consecutive levels.
    pub level_spacing: f32,
    /// Random branch cuts made by `generate::tunnel` after the central shaft.
    pub tunnel_branch_count: u32,
}

impl AsteroidConfig {
    /// Parse and validate a config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AsteroidConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every dimension is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("tile_group_size", self.tile_group_size),
            ("level_size", self.level_size),
            ("num_levels", self.num_levels),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDimension { field });
            }
        }
        self.check_cell_counts()?;
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        if !self.level_spacing.is_finite() {
            return Err(ConfigError::InvalidLevelSpacing(self.level_spacing));
        }
        Ok(())
    }

    /// Every size derived from G, L and D must fit: the level side in `i32`
    /// (public coordinates are signed), groups per level in `u32`, and the
    /// cell counts in `usize`.
    fn check_cell_counts(&self) -> Result<(), ConfigError> {
        let too_large = |what| ConfigError::TooLarge { what };
        let g = self.tile_group_size as usize;
        let side = self
            .tile_group_size
            .checked_mul(self.level_size)
            .filter(|&side| side <= i32::MAX as u32)
            .ok_or_else(|| too_large("level side (G * L)"))? as usize;
        // Levels index their groups with u32.
        self.level_size
            .checked_mul(self.level_size)
            .ok_or_else(|| too_large("groups per level (L * L)"))?;
        g.checked_mul(g)
            .ok_or_else(|| too_large("cells per group (G * G)"))?;
        side.checked_mul(side)
            .and_then(|per_level| per_level.checked_mul(self.num_levels as usize))
            .ok_or_else(|| too_large("total cells (G * L)^2 * D"))?;
        Ok(())
    }

    /// Cells per row of a level (G * L).
    pub fn width(&self) -> u32 {
        self.tile_group_size * self.level_size
    }

    /// Cells per column of a level (G * L).
    pub fn height(&self) -> u32 {
        self.tile_group_size * self.level_size
    }

    /// Number of levels.
    pub fn depth(&self) -> u32 {
        self.num_levels
    }

    /// World extent of one tile group along X or Z.
    pub fn group_span(&self) -> f32 {
        self.tile_group_size as f32 * self.tile_size
    }
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            tile_size: 10.0,
            tile_group_size: 5,
            level_size: 7,
            num_levels: 12,
            level_spacing: 50.0,
            tunnel_branch_count: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_35_by_35_by_12() {
        let config = AsteroidConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.width(), 35);
        assert_eq!(config.height(), 35);
        assert_eq!(config.depth(), 12);
        assert_eq!(config.group_span(), 50.0);
    }

    #[test]
    fn loads_from_json_string() {
        let json = r#"{
            "tile_size": 2.0,
            "tile_group_size": 4,
            "level_size": 3,
            "num_levels": 6,
            "level_spacing": 8.0,
            "tunnel_branch_count": 5
        }"#;
        let config = AsteroidConfig::from_json(json).unwrap();
        assert_eq!(config.width(), 12);
        assert_eq!(config.depth(), 6);
        assert_eq!(config.tunnel_branch_count, 5);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let config = AsteroidConfig {
            level_size: 0,
            ..AsteroidConfig::default()
        };
        match config.validate() {
            Err(ConfigError::ZeroDimension { field }) => assert_eq!(field, "level_size"),
            other => panic!("expected ZeroDimension, got {other:?}"),
        }
    }

    #[test]
    fn bad_tile_size_is_rejected() {
        for tile_size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = AsteroidConfig {
                tile_size,
                ..AsteroidConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTileSize(_))
            ));
        }
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let wide = AsteroidConfig {
            tile_group_size: 1 << 16,
            level_size: 1 << 16,
            ..AsteroidConfig::default()
        };
        assert!(matches!(
            wide.validate(),
            Err(ConfigError::TooLarge { .. })
        ));

        // Fits in u32 but not in the signed coordinate range.
        let past_i32 = AsteroidConfig {
            tile_group_size: 1 << 16,
            level_size: 1 << 15,
            num_levels: 1,
            ..AsteroidConfig::default()
        };
        assert!(matches!(
            past_i32.validate(),
            Err(ConfigError::TooLarge { .. })
        ));

        let many_groups = AsteroidConfig {
            tile_group_size: 1,
            level_size: 1 << 16,
            num_levels: 1,
            ..AsteroidConfig::default()
        };
        assert!(matches!(
            many_groups.validate(),
            Err(ConfigError::TooLarge { .. })
        ));

        let deep = AsteroidConfig {
            tile_group_size: 1 << 10,
            level_size: 1 << 10,
            num_levels: u32::MAX,
            ..AsteroidConfig::default()
        };
        assert!(matches!(
            deep.validate(),
            Err(ConfigError::TooLarge { .. })
        ));
    }

    #[test]
    fn oversized_config_never_reaches_construction() {
        let config = AsteroidConfig {
            tile_group_size: 1 << 16,
            level_size: 1 << 16,
            ..AsteroidConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(matches!(
            AsteroidConfig::from_json(&json),
            Err(ConfigError::TooLarge { .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            AsteroidConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn json_with_invalid_values_fails_validation() {
        let json = serde_json::to_string(&AsteroidConfig {
            num_levels: 0,
            ..AsteroidConfig::default()
        })
        .unwrap();
        assert!(matches!(
            AsteroidConfig::from_json(&json),
            Err(ConfigError::ZeroDimension { .. })
        ));
    }
}
