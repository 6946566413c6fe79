//! Per-frame simulation pipeline.
//!
//! One `step` runs, in order:
//!   1. the player's state machine on this frame's input
//!   2. physics integration for every entity
//!   3. player-vs-world collision resolution (and landing)
//!   4. animation advance for every entity with an active animation
//!
//! All integration finishes before any collision is resolved, and every pass
//! walks the level layer before the character layer.

use glam::Vec2;

use crate::collision::{resolve_player_collisions, ContactState};
use crate::config::GameConfig;
use crate::controller::{self, FrameInput};
use crate::entity::{EntityStore, PlayerState};
use crate::physics;
use crate::resources::{AssetHandle, PlayerSkins};

/// What the renderer needs to draw one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteView {
    pub position: Vec2,
    pub direction: f32,
    pub texture: AssetHandle,
    pub frame: Option<u32>,
}

pub struct World {
    store: EntityStore,
    config: GameConfig,
    skins: PlayerSkins,
    frame_count: u64,
    last_contacts: ContactState,
}

impl World {
    pub fn new(store: EntityStore, config: GameConfig, skins: PlayerSkins) -> Self {
        Self {
            store,
            config,
            skins,
            frame_count: 0,
            last_contacts: ContactState::default(),
        }
    }

    pub fn step(&mut self, input: FrameInput, dt: f32) {
        if let Some(player) = self.store.player_mut() {
            controller::update_player(player, input, dt, &self.config.player, &self.skins);
        }

        physics::integrate(&mut self.store, input.direction, dt, &self.config.physics);

        let contacts = resolve_player_collisions(&mut self.store);
        if contacts.landed() {
            if let Some(player) = self.store.player_mut() {
                controller::land(player, &self.skins);
            }
        }
        self.last_contacts = contacts;

        for entity in self.store.iter_mut() {
            entity.step_animation(dt);
        }
        self.frame_count += 1;
    }

    #[allow(dead_code)]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn last_contacts(&self) -> ContactState {
        self.last_contacts
    }

    pub fn player_state(&self) -> Option<PlayerState> {
        self.store.player().and_then(|p| p.player_state())
    }

    /// Draw list in layer order.
    pub fn sprite_views(&self) -> Vec<SpriteView> {
        self.store
            .iter()
            .map(|e| SpriteView {
                position: e.position,
                direction: e.direction,
                texture: e.texture,
                frame: e.active_animation().map(|a| a.current_frame()),
            })
            .collect()
    }

    /// One-line diagnostics for the debug overlay.
    pub fn status_line(&self) -> String {
        match self.store.player() {
            Some(p) => format!(
                "frame {} | state {} | pos ({:.1}, {:.1}) | vel ({:.1}, {:.1}) | facing {}",
                self.frame_count,
                p.player_state().map(PlayerState::label).unwrap_or("-"),
                p.position.x,
                p.position.y,
                p.velocity.x,
                p.velocity.y,
                if p.direction < 0.0 { "left" } else { "right" }
            ),
            None => format!("frame {} | no player", self.frame_count),
        }
    }
}
