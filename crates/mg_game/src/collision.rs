//! Player-vs-world overlap detection and single-axis resolution.
//!
//! Each frame the player's collider is tested against every other entity,
//! level layer first. An overlapping level tile is resolved along whichever
//! axis penetrates less: `overlap.w < overlap.h` is a side hit, anything else
//! (ties included) is treated as vertical. Vertical hits are only resolved
//! while falling, so ceilings do not stop an upward jump.
//!
//! Pairs are resolved one at a time as they are visited. A player overlapping
//! two tiles in the same frame is pushed out by both.

use glam::Vec2;
use serde::Deserialize;

use crate::entity::{EntityKind, EntityStore, Layer};

/// Axis-aligned rectangle: top-left corner plus size, y pointing down.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Overlap rectangle, or `None` when the rectangles only touch or are apart.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionAxis {
    Horizontal,
    Vertical,
}

/// Strict `w < h`: equal extents resolve vertically.
pub fn penetration_axis(overlap: &Rect) -> CollisionAxis {
    if overlap.w < overlap.h {
        CollisionAxis::Horizontal
    } else {
        CollisionAxis::Vertical
    }
}

/// What the player touched during one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    /// Overlapping pairs seen, resolved or not.
    pub overlaps: u32,
}

impl ContactState {
    pub fn landed(&self) -> bool {
        self.down
    }
}

/// Resolves the player against every other entity in store order.
pub fn resolve_player_collisions(store: &mut EntityStore) -> ContactState {
    let mut contacts = ContactState::default();
    let Some(player_index) = store.player_index() else {
        return contacts;
    };

    for layer in Layer::ALL {
        for index in 0..store.layer(layer).len() {
            if layer == Layer::Characters && index == player_index {
                continue;
            }
            let other = &store.layer(layer)[index];
            let other_rect = other.world_collider();
            let other_is_level = matches!(other.kind, EntityKind::Level);

            let player = &mut store.layer_mut(Layer::Characters)[player_index];
            let Some(overlap) = player.world_collider().intersection(&other_rect) else {
                continue;
            };
            contacts.overlaps += 1;

            if !other_is_level {
                continue;
            }

            match penetration_axis(&overlap) {
                CollisionAxis::Horizontal => {
                    if player.velocity.x > 0.0 {
                        player.position.x -= overlap.w;
                        contacts.right = true;
                    } else if player.velocity.x < 0.0 {
                        player.position.x += overlap.w;
                        contacts.left = true;
                    }
                    player.velocity.x = 0.0;
                    log::trace!("side hit vs tile {index}: pushed {:.3}", overlap.w);
                }
                CollisionAxis::Vertical => {
                    if player.velocity.y > 0.0 {
                        player.position.y -= overlap.h;
                        player.velocity.y = 0.0;
                        contacts.down = true;
                        log::trace!("landed on tile {index}: pushed {:.3}", overlap.h);
                    }
                }
            }
        }
    }

    contacts
}
