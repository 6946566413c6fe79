//! Make Guns -- simulation entry point.
//!
//! Runs the platformer simulation headless: startup content is loaded once,
//! the level is built, and a scripted input replay drives the per-frame
//! pipeline (`World::step`). Windowing, texture upload and drawing belong to
//! the presentation layer, which only consumes `World::sprite_views`.
//!
//! Startup content is optional on disk. A missing file falls back to the
//! built-in defaults; a file that exists but fails validation is fatal, as is
//! a level without a player spawn.

mod collision;
mod config;
mod controller;
mod entity;
mod level;
mod physics;
mod replay;
mod resources;
mod world;

use std::path::Path;

use config::{load_config_from_path, GameConfig};
use level::{build_level, default_grid, load_level_from_path};
use replay::{load_replay_from_path, play_with, ReplaySequence};
use resources::{load_resources_from_path, Resources};
use world::World;

const CONFIG_PATH: &str = "assets/config/game.json";
const RESOURCES_PATH: &str = "assets/resources.json";
const LEVEL_PATH: &str = "assets/levels/level1.json";
const REPLAY_PATH: &str = "assets/replays/demo.json";
const STATUS_INTERVAL_FRAMES: u64 = 60;

fn load_or_default<T>(
    path: &str,
    what: &str,
    load: impl FnOnce(&Path) -> Result<T, String>,
    fallback: impl FnOnce() -> T,
) -> T {
    let path = Path::new(path);
    if !path.exists() {
        log::warn!(
            "{what} '{}' not found, using built-in defaults",
            path.display()
        );
        return fallback();
    }
    let loaded = load(path).unwrap_or_else(|err| {
        panic!("Failed to load initial {what} '{}': {}", path.display(), err);
    });
    log::info!("Loaded {what} '{}'", path.display());
    loaded
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Make Guns simulation starting...");

    let config = load_or_default(CONFIG_PATH, "config", load_config_from_path, GameConfig::default);
    let resources = load_or_default(
        RESOURCES_PATH,
        "resource manifest",
        load_resources_from_path,
        Resources::builtin,
    );
    let grid = load_or_default(LEVEL_PATH, "level", load_level_from_path, default_grid);
    let replay = load_or_default(REPLAY_PATH, "replay", load_replay_from_path, ReplaySequence::demo);

    log::info!(
        "{} textures registered, tile size {}, gravity {}",
        resources.textures.len(),
        config.layout.tile_size,
        config.physics.gravity
    );

    let store = build_level(&grid, &config.layout, &config.player, &resources);
    let mut world = World::new(store, config, resources.player.clone());

    let frames = play_with(&mut world, &replay, |world| {
        if world.frame_count() % STATUS_INTERVAL_FRAMES == 0 {
            log::info!("{}", world.status_line());
        }
        let contacts = world.last_contacts();
        if contacts.left || contacts.right {
            log::debug!(
                "frame {}: blocked by wall ({} overlaps)",
                world.frame_count(),
                contacts.overlaps
            );
        }
    });

    let views = world.sprite_views();
    if let Some(player_view) = views.last() {
        log::info!(
            "Player sprite '{}' frame {:?}",
            resources.textures.path(player_view.texture).unwrap_or("?"),
            player_view.frame
        );
    }
    log::info!(
        "Replay finished after {} frames ({} sprites), player {}: {}",
        frames,
        views.len(),
        world.player_state().map(|s| s.label()).unwrap_or("missing"),
        world.status_line()
    );
}
