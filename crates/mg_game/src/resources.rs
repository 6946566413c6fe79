//! Resource manifest: texture handles, player animation set and tile codes.
//!
//! The simulation never loads image data. It only needs stable identifiers
//! for the renderer to resolve later, so the manifest assigns an
//! `AssetHandle` to every texture path in declaration order. Entities store
//! handles, never the textures themselves.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use mg_core::animation::{AnimationSpec, FrameAnimator};

pub const ANIM_PLAYER_IDLE: usize = 0;
pub const ANIM_PLAYER_RUN: usize = 1;

/// Opaque, non-owning reference to a texture held by the renderer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub u32);

#[derive(Debug, Clone, Default)]
pub struct TextureTable {
    paths: Vec<String>,
    by_path: HashMap<String, AssetHandle>,
}

impl TextureTable {
    /// Returns the existing handle when `path` was already registered.
    pub fn register(&mut self, path: &str) -> AssetHandle {
        if let Some(handle) = self.by_path.get(path) {
            return *handle;
        }
        let handle = AssetHandle(self.paths.len() as u32);
        self.paths.push(path.to_string());
        self.by_path.insert(path.to_string(), handle);
        handle
    }

    #[allow(dead_code)]
    pub fn handle(&self, path: &str) -> Option<AssetHandle> {
        self.by_path.get(path).copied()
    }

    pub fn path(&self, handle: AssetHandle) -> Option<&str> {
        self.paths.get(handle.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

/// What a grid code instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Static { texture: AssetHandle },
    PlayerSpawn,
}

#[derive(Debug, Clone, Default)]
pub struct TileTable {
    kinds: HashMap<u8, TileKind>,
}

impl TileTable {
    pub fn insert(&mut self, code: u8, kind: TileKind) {
        self.kinds.insert(code, kind);
    }

    /// `None` for empty or unknown codes.
    pub fn lookup(&self, code: u8) -> Option<TileKind> {
        self.kinds.get(&code).copied()
    }
}

/// Player textures plus the animation list cloned into the player entity.
/// Indices follow `ANIM_PLAYER_IDLE` / `ANIM_PLAYER_RUN`.
#[derive(Debug, Clone)]
pub struct PlayerSkins {
    pub idle_texture: AssetHandle,
    pub run_texture: AssetHandle,
    pub animations: Vec<FrameAnimator>,
}

#[derive(Debug, Clone)]
pub struct Resources {
    pub textures: TextureTable,
    pub player: PlayerSkins,
    pub tiles: TileTable,
}

impl Resources {
    pub fn from_manifest(manifest: &ResourceManifest) -> Self {
        let mut textures = TextureTable::default();
        for path in &manifest.textures {
            textures.register(path);
        }

        let player = PlayerSkins {
            idle_texture: textures.register(&manifest.player.idle.texture),
            run_texture: textures.register(&manifest.player.run.texture),
            animations: vec![
                FrameAnimator::from_spec(manifest.player.idle.animation),
                FrameAnimator::from_spec(manifest.player.run.animation),
            ],
        };

        let mut tiles = TileTable::default();
        for tile in &manifest.tiles {
            let texture = textures.register(&tile.texture);
            tiles.insert(tile.code, TileKind::Static { texture });
        }
        tiles.insert(manifest.player_code, TileKind::PlayerSpawn);

        Self {
            textures,
            player,
            tiles,
        }
    }

    /// Asset set of the shipped game, used when no manifest file is present.
    pub fn builtin() -> Self {
        Self::from_manifest(&ResourceManifest::builtin())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResourceManifest {
    pub version: String,
    #[serde(default)]
    pub textures: Vec<String>,
    pub player: PlayerManifest,
    pub tiles: Vec<TileManifest>,
    pub player_code: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlayerManifest {
    pub idle: SkinManifest,
    pub run: SkinManifest,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SkinManifest {
    pub texture: String,
    #[serde(flatten)]
    pub animation: AnimationSpec,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TileManifest {
    pub code: u8,
    pub texture: String,
}

impl ResourceManifest {
    pub fn builtin() -> Self {
        let tile = |code: u8, texture: &str| TileManifest {
            code,
            texture: texture.to_string(),
        };
        Self {
            version: "0.1".to_string(),
            textures: Vec::new(),
            player: PlayerManifest {
                idle: SkinManifest {
                    texture: "data/idle.png".to_string(),
                    animation: AnimationSpec {
                        frame_count: 8,
                        length: 1.6,
                    },
                },
                run: SkinManifest {
                    texture: "data/run.png".to_string(),
                    animation: AnimationSpec {
                        frame_count: 4,
                        length: 0.5,
                    },
                },
            },
            tiles: vec![
                tile(1, "data/tiles/ground.png"),
                tile(2, "data/tiles/panel.png"),
                tile(5, "data/tiles/grass.png"),
                tile(6, "data/tiles/brick.png"),
            ],
            player_code: 4,
        }
    }
}

pub fn load_resources_from_path(path: &Path) -> Result<Resources, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let manifest: ResourceManifest = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse resource manifest {}: {e}", path.display()))?;
    validate_manifest(&manifest)?;
    Ok(Resources::from_manifest(&manifest))
}

fn validate_manifest(manifest: &ResourceManifest) -> Result<(), String> {
    if manifest.version != "0.1" {
        return Err(format!(
            "Resource validation failed: unsupported version '{}'",
            manifest.version
        ));
    }
    manifest.player.idle.animation.validate()?;
    manifest.player.run.animation.validate()?;

    if manifest.player_code == 0 {
        return Err("Resource validation failed: code 0 is reserved for empty cells".to_string());
    }
    let mut codes = HashSet::new();
    for tile in &manifest.tiles {
        if tile.code == 0 {
            return Err(
                "Resource validation failed: code 0 is reserved for empty cells".to_string(),
            );
        }
        if tile.code == manifest.player_code {
            return Err(format!(
                "Resource validation failed: tile code {} collides with the player code",
                tile.code
            ));
        }
        if !codes.insert(tile.code) {
            return Err(format!(
                "Resource validation failed: duplicate tile code {}",
                tile.code
            ));
        }
        if tile.texture.is_empty() {
            return Err(format!(
                "Resource validation failed: tile code {} has an empty texture path",
                tile.code
            ));
        }
    }
    Ok(())
}
