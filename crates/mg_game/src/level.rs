//! Level construction from a grid of tile codes.
//!
//! Cells are visited row-major. Row `r`, column `c` maps to world position
//! `(c * tile, floor_y - (anchor_rows - r) * tile)`, which stacks the first
//! `anchor_rows` rows directly on top of the floor line. Rows at or past
//! `anchor_rows` use the same formula and so end up below the floor.
//!
//! A level without a player spawn cannot be played. `try_build_level`
//! reports that as an error; `build_level` treats it as fatal.

use glam::Vec2;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::collision::Rect;
use crate::config::{LevelLayout, PlayerConfig};
use crate::entity::{Entity, EntityKind, EntityStore, Layer, PlayerData};
use crate::resources::{PlayerSkins, Resources, TileKind, ANIM_PLAYER_IDLE};

#[derive(Debug, Clone, PartialEq)]
pub struct LevelGrid {
    rows: Vec<Vec<u8>>,
    anchor_rows: usize,
}

impl LevelGrid {
    /// Anchors on the grid's own row count.
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self, String> {
        let anchor_rows = rows.len();
        Self::with_anchor_rows(rows, anchor_rows)
    }

    pub fn with_anchor_rows(rows: Vec<Vec<u8>>, anchor_rows: usize) -> Result<Self, String> {
        let Some(first) = rows.first() else {
            return Err("Level validation failed: grid has no rows".to_string());
        };
        let columns = first.len();
        if columns == 0 {
            return Err("Level validation failed: grid has no columns".to_string());
        }
        if let Some(r) = rows.iter().position(|row| row.len() != columns) {
            return Err(format!(
                "Level validation failed: row {} has {} columns, expected {}",
                r,
                rows[r].len(),
                columns
            ));
        }
        Ok(Self { rows, anchor_rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows[0].len()
    }

    #[allow(dead_code)]
    pub fn anchor_rows(&self) -> usize {
        self.anchor_rows
    }

    /// `(row, column, code)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, &code)| (r, c, code))
        })
    }

    /// Top-left world position of a cell.
    pub fn cell_position(&self, layout: &LevelLayout, row: usize, column: usize) -> Vec2 {
        Vec2::new(
            column as f32 * layout.tile_size,
            layout.floor_y - (self.anchor_rows as f32 - row as f32) * layout.tile_size,
        )
    }
}

/// The shipped first stage: 5 rows by 50 columns.
pub fn default_grid() -> LevelGrid {
    const ROWS: usize = 5;
    const COLS: usize = 50;
    let mut rows = vec![vec![0u8; COLS]; ROWS];
    for cell in rows[ROWS - 1].iter_mut() {
        *cell = 1;
    }
    for c in [12, 13, 14, 30, 31] {
        rows[2][c] = 2;
    }
    for c in [20, 21, 22, 23] {
        rows[ROWS - 2][c] = 6;
    }
    rows[ROWS - 3][22] = 6;
    rows[ROWS - 3][23] = 6;
    for c in [3, 4, 5, 40, 41] {
        rows[ROWS - 2][c] = 5;
    }
    rows[ROWS - 2][1] = 4;
    LevelGrid {
        rows,
        anchor_rows: ROWS,
    }
}

pub fn try_build_level(
    grid: &LevelGrid,
    layout: &LevelLayout,
    player_config: &PlayerConfig,
    resources: &Resources,
) -> Result<EntityStore, String> {
    let mut store = EntityStore::new();
    let tile_collider = Rect::new(0.0, 0.0, layout.tile_size, layout.tile_size);

    for (row, column, code) in grid.cells() {
        let Some(kind) = resources.tiles.lookup(code) else {
            if code != 0 {
                log::trace!("Skipping unknown tile code {code} at ({row}, {column})");
            }
            continue;
        };
        let position = grid.cell_position(layout, row, column);

        match kind {
            TileKind::Static { texture } => {
                let mut tile = Entity::new(EntityKind::Level, position, texture);
                tile.collider = tile_collider;
                store.push(Layer::Level, tile);
            }
            TileKind::PlayerSpawn => {
                if store.player_index().is_some() {
                    return Err(format!(
                        "Level build failed: second player spawn at ({row}, {column})"
                    ));
                }
                store.push_player(spawn_player(position, player_config, &resources.player));
            }
        }
    }

    if store.player_index().is_none() {
        return Err("Level build failed: no player spawn marker in grid".to_string());
    }

    log::info!(
        "Level built: {}x{} grid, {} tiles, player at {:?}",
        grid.row_count(),
        grid.column_count(),
        store.layer(Layer::Level).len(),
        store.player().map(|p| p.position)
    );
    Ok(store)
}

/// Builds the level, treating a missing player spawn as an unrecoverable
/// startup failure.
pub fn build_level(
    grid: &LevelGrid,
    layout: &LevelLayout,
    player_config: &PlayerConfig,
    resources: &Resources,
) -> EntityStore {
    try_build_level(grid, layout, player_config, resources).unwrap_or_else(|err| panic!("{err}"))
}

fn spawn_player(position: Vec2, config: &PlayerConfig, skins: &PlayerSkins) -> Entity {
    let mut player = Entity::new(
        EntityKind::Player(PlayerData::default()),
        position,
        skins.idle_texture,
    );
    player.animations = skins.animations.clone();
    player.current_animation = Some(ANIM_PLAYER_IDLE);
    player.acceleration = Vec2::new(config.acceleration, 0.0);
    player.max_speed_x = config.max_speed_x;
    player.dynamic = true;
    player.collider = config.hitbox;
    player
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub rows: Vec<Vec<u8>>,
    #[serde(default)]
    pub anchor_rows: Option<usize>,
}

pub fn load_level_from_path(path: &Path) -> Result<LevelGrid, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let file: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    if file.version != "0.1" {
        return Err(format!(
            "Level validation failed: unsupported version '{}'",
            file.version
        ));
    }
    let anchor_rows = file.anchor_rows.unwrap_or(file.rows.len());
    let grid = LevelGrid::with_anchor_rows(file.rows, anchor_rows)?;
    log::info!(
        "Loaded level '{}' ({}x{})",
        file.level_id,
        grid.row_count(),
        grid.column_count()
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PlayerState;
    use crate::resources::ANIM_PLAYER_RUN;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "mg_level_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn build(grid: &LevelGrid) -> Result<EntityStore, String> {
        try_build_level(
            grid,
            &LevelLayout::default(),
            &PlayerConfig::default(),
            &Resources::builtin(),
        )
    }

    #[test]
    fn rows_past_the_anchor_land_below_the_floor() {
        let mut rows = vec![vec![0u8; 6]; 9];
        rows[0][0] = 4;
        rows[8][4] = 2;
        let grid = LevelGrid::with_anchor_rows(rows, 5).expect("valid grid");

        let store = build(&grid).expect("level builds");
        let tiles = store.layer(Layer::Level);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].position, Vec2::new(128.0, 416.0));
        assert_eq!(tiles[0].collider, Rect::new(0.0, 0.0, 32.0, 32.0));
    }

    #[test]
    fn cells_are_anchored_to_the_floor() {
        let grid = LevelGrid::new(vec![vec![4, 0], vec![1, 1]]).expect("valid grid");
        let store = build(&grid).expect("level builds");

        let player = store.player().expect("player spawned");
        assert_eq!(player.position, Vec2::new(0.0, 256.0));

        let tiles = store.layer(Layer::Level);
        assert_eq!(tiles[0].position, Vec2::new(0.0, 288.0));
        assert_eq!(tiles[1].position, Vec2::new(32.0, 288.0));
    }

    #[test]
    fn player_spawn_is_fully_configured() {
        let grid = LevelGrid::new(vec![vec![0, 4], vec![1, 1]]).expect("valid grid");
        let store = build(&grid).expect("level builds");
        let res = Resources::builtin();

        assert_eq!(store.layer(Layer::Characters).len(), 1);
        assert_eq!(store.player_index(), Some(0));
        let player = store.player().expect("player spawned");
        assert_eq!(player.player_state(), Some(PlayerState::Idle));
        assert!(player.dynamic);
        assert_eq!(player.acceleration, Vec2::new(300.0, 0.0));
        assert_eq!(player.max_speed_x, 100.0);
        assert_eq!(player.collider, Rect::new(11.0, 6.0, 10.0, 26.0));
        assert_eq!(player.texture, res.player.idle_texture);
        assert_eq!(player.current_animation, Some(ANIM_PLAYER_IDLE));
        assert_eq!(player.animations[ANIM_PLAYER_RUN].frame_count(), 4);
        assert_eq!(player.direction, 1.0);
    }

    #[test]
    fn unknown_and_empty_codes_are_skipped() {
        let grid = LevelGrid::new(vec![vec![4, 3, 9, 0], vec![1, 2, 5, 6]]).expect("valid grid");
        let store = build(&grid).expect("level builds");
        assert_eq!(store.layer(Layer::Level).len(), 4);
        assert_eq!(store.layer(Layer::Characters).len(), 1);
    }

    #[test]
    fn level_tiles_are_static_and_textured_per_code() {
        let grid = LevelGrid::new(vec![vec![4, 0], vec![1, 6]]).expect("valid grid");
        let store = build(&grid).expect("level builds");
        let res = Resources::builtin();
        let tiles = store.layer(Layer::Level);

        assert!(tiles.iter().all(|t| !t.dynamic && t.velocity == Vec2::ZERO));
        assert_eq!(
            res.textures.path(tiles[0].texture),
            Some("data/tiles/ground.png")
        );
        assert_eq!(
            res.textures.path(tiles[1].texture),
            Some("data/tiles/brick.png")
        );
    }

    #[test]
    fn missing_player_marker_is_reported() {
        let grid = LevelGrid::new(vec![vec![0, 0], vec![1, 1]]).expect("valid grid");
        let err = build(&grid).expect_err("no player should fail");
        assert!(err.contains("no player spawn"));
    }

    #[test]
    #[should_panic(expected = "no player spawn marker")]
    fn build_level_without_player_is_fatal() {
        let grid = LevelGrid::new(vec![vec![1, 2, 5, 6]]).expect("valid grid");
        build_level(
            &grid,
            &LevelLayout::default(),
            &PlayerConfig::default(),
            &Resources::builtin(),
        );
    }

    #[test]
    fn second_player_marker_is_rejected() {
        let grid = LevelGrid::new(vec![vec![4, 4], vec![1, 1]]).expect("valid grid");
        let err = build(&grid).expect_err("two players should fail");
        assert!(err.contains("second player spawn"));
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let err = LevelGrid::new(vec![vec![0, 0], vec![1]]).expect_err("ragged grid");
        assert!(err.contains("row 1 has 1 columns"));
        assert!(LevelGrid::new(Vec::new()).is_err());
    }

    #[test]
    fn default_grid_builds_with_one_player() {
        let grid = default_grid();
        assert_eq!(grid.row_count(), 5);
        assert_eq!(grid.column_count(), 50);
        let store = build(&grid).expect("default level builds");
        assert_eq!(store.layer(Layer::Characters).len(), 1);
        assert!(store.layer(Layer::Level).len() >= 50);
    }

    #[test]
    fn load_level_file_honours_anchor_rows() {
        let path = temp_file_path("anchor");
        fs::write(
            &path,
            r#"{ "version": "0.1", "level_id": "test", "rows": [[4, 0], [1, 1]], "anchor_rows": 5 }"#,
        )
        .expect("write temp file");

        let grid = load_level_from_path(&path).expect("level file should load");
        assert_eq!(grid.anchor_rows(), 5);
        assert_eq!(
            grid.cell_position(&LevelLayout::default(), 1, 1),
            Vec2::new(32.0, 192.0)
        );
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_level_file_rejects_bad_version() {
        let path = temp_file_path("version");
        fs::write(&path, r#"{ "version": "2.0", "level_id": "x", "rows": [[4]] }"#)
            .expect("write temp file");
        let err = load_level_from_path(&path).expect_err("bad version should fail");
        assert!(err.contains("unsupported version"));
        let _ = fs::remove_file(path);
    }
}
