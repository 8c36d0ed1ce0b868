//! Weapon metadata loading.
//!
//! Weapon stats arrive as JSON from the asset layer. Malformed or partial
//! metadata never aborts equipping: unknown fields are ignored, missing
//! fields take defaults, and a completely unreadable document falls back to
//! the default stat block with a warning.

use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse weapon metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Stats shared by every attack strategy variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Damage applied per hit (instant-kill variants ignore this).
    pub damage: i32,
    /// Seconds between activations.
    pub cooldown: f32,
    /// Melee reach in world units.
    pub reach: f32,
    /// Full melee arc in degrees.
    pub arc_deg: f32,
    /// Clip fraction at which the effect fires.
    pub fire_fraction: f32,
    /// Wand: projectiles per cast.
    pub multishot: u32,
    /// Wand: total yaw spread across the multishot fan, degrees.
    pub spread_deg: f32,
    /// Wand: local muzzle offset (right, up, forward).
    pub muzzle_offset: [f32; 3],
    /// Name of the animation clip driving this weapon's action.
    pub clip: String,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            damage: MELEE_DEFAULT_DAMAGE,
            cooldown: ATTACK_DEFAULT_COOLDOWN,
            reach: MELEE_DEFAULT_REACH,
            arc_deg: MELEE_DEFAULT_ARC_DEG,
            fire_fraction: MELEE_FIRE_FRACTION,
            multishot: 1,
            spread_deg: 0.0,
            muzzle_offset: [0.0, 1.2, 0.6],
            clip: String::new(),
        }
    }
}

impl WeaponConfig {
    /// Strict parse, surfacing the JSON error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse weapon metadata, substituting the default stat block when the
    /// document is unreadable.
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("malformed weapon metadata, using defaults: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_metadata_fills_defaults() {
        let cfg = WeaponConfig::from_json(r#"{"damage": 25, "reach": 4.0}"#).unwrap();
        assert_eq!(cfg.damage, 25);
        assert_eq!(cfg.reach, 4.0);
        assert_eq!(cfg.cooldown, ATTACK_DEFAULT_COOLDOWN);
        assert_eq!(cfg.multishot, 1);
    }

    #[test]
    fn test_malformed_metadata_substitutes_defaults() {
        let cfg = WeaponConfig::from_json_or_default("not json at all");
        assert_eq!(cfg.damage, MELEE_DEFAULT_DAMAGE);
        assert_eq!(cfg.arc_deg, MELEE_DEFAULT_ARC_DEG);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let cfg = WeaponConfig::from_json(r#"{"damage": 7, "sparkle": true}"#).unwrap();
        assert_eq!(cfg.damage, 7);
    }
}
