//! Gameplay tuning, loadable from JSON.
//!
//! Every field has a default so a config file only needs the values it
//! overrides. World space is in logical pixels with y pointing down.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::collision::Rect;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub layout: LevelLayout,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration for dynamic entities, px/s².
    pub gravity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { gravity: 500.0 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal acceleration while a direction is held, px/s².
    pub acceleration: f32,
    pub max_speed_x: f32,
    /// Upward speed added on jump, px/s.
    pub jump_impulse: f32,
    /// Idle braking as a multiple of `acceleration`.
    pub deceleration_factor: f32,
    /// Hitbox relative to the sprite's top-left corner.
    pub hitbox: Rect,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            acceleration: 300.0,
            max_speed_x: 100.0,
            jump_impulse: 200.0,
            deceleration_factor: 1.5,
            hitbox: Rect::new(11.0, 6.0, 10.0, 26.0),
        }
    }
}

/// Placement of the tile grid in world space.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct LevelLayout {
    pub tile_size: f32,
    /// World y the grid's anchor row count is measured up from.
    pub floor_y: f32,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            floor_y: 320.0,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.physics.gravity < 0.0 {
        return Err("Config validation failed: gravity must be >= 0 (y points down)".to_string());
    }
    let player = &config.player;
    if player.acceleration < 0.0 || player.max_speed_x <= 0.0 {
        return Err(
            "Config validation failed: player acceleration must be >= 0 and max_speed_x > 0"
                .to_string(),
        );
    }
    if player.deceleration_factor < 0.0 || player.jump_impulse < 0.0 {
        return Err(
            "Config validation failed: deceleration_factor and jump_impulse must be >= 0"
                .to_string(),
        );
    }
    if player.hitbox.w <= 0.0 || player.hitbox.h <= 0.0 {
        return Err("Config validation failed: player hitbox must have positive size".to_string());
    }
    if config.layout.tile_size <= 0.0 {
        return Err("Config validation failed: tile_size must be > 0".to_string());
    }
    Ok(())
}
