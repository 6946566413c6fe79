//! Entity model and the two-layer entity store.
//!
//! Every entity shares one set of kinematic fields; kind-specific data lives
//! in the `EntityKind` payload so only the player can carry a movement state.

use glam::Vec2;
use mg_core::FrameAnimator;

use crate::collision::Rect;
use crate::resources::AssetHandle;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    #[default]
    Idle,
    Running,
    Jumping,
}

impl PlayerState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Jumping => "jumping",
        }
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerData {
    pub state: PlayerState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player(PlayerData),
    Level,
    /// Declared for level content; has no behavior yet.
    #[allow(dead_code)]
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Horizontal facing, always -1.0 or 1.0.
    pub direction: f32,
    /// Offset and size relative to `position`.
    pub collider: Rect,
    /// Affected by gravity.
    pub dynamic: bool,
    pub max_speed_x: f32,
    pub animations: Vec<FrameAnimator>,
    pub current_animation: Option<usize>,
    pub texture: AssetHandle,
}

impl Entity {
    pub fn new(kind: EntityKind, position: Vec2, texture: AssetHandle) -> Self {
        Self {
            kind,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            direction: 1.0,
            collider: Rect::default(),
            dynamic: false,
            max_speed_x: 0.0,
            animations: Vec::new(),
            current_animation: None,
            texture,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn player_state(&self) -> Option<PlayerState> {
        match self.kind {
            EntityKind::Player(data) => Some(data.state),
            _ => None,
        }
    }

    /// Mutable access to the player payload; `None` for every other kind.
    pub fn player_data_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.kind {
            EntityKind::Player(data) => Some(data),
            _ => None,
        }
    }

    /// Collider in world space.
    pub fn world_collider(&self) -> Rect {
        self.collider.translated(self.position)
    }

    pub fn active_animation(&self) -> Option<&FrameAnimator> {
        self.current_animation.and_then(|i| self.animations.get(i))
    }

    /// Switches texture and active animation together; animation progress is kept.
    pub fn set_skin(&mut self, texture: AssetHandle, animation: usize) {
        self.texture = texture;
        self.current_animation = Some(animation);
    }

    pub fn step_animation(&mut self, dt: f32) {
        if let Some(anim) = self
            .current_animation
            .and_then(|i| self.animations.get_mut(i))
        {
            anim.step(dt);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Level = 0,
    Characters = 1,
}

impl Layer {
    /// Iteration order used by every per-frame pass.
    pub const ALL: [Layer; 2] = [Layer::Level, Layer::Characters];
}

#[derive(Debug, Default, Clone)]
pub struct EntityStore {
    layers: [Vec<Entity>; 2],
    player_index: Option<usize>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, layer: Layer, entity: Entity) -> usize {
        let entities = &mut self.layers[layer as usize];
        entities.push(entity);
        entities.len() - 1
    }

    /// Adds the player to the character layer and records its index.
    pub fn push_player(&mut self, entity: Entity) -> usize {
        debug_assert!(entity.is_player());
        let index = self.push(Layer::Characters, entity);
        self.player_index = Some(index);
        index
    }

    pub fn layer(&self, layer: Layer) -> &[Entity] {
        &self.layers[layer as usize]
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut [Entity] {
        &mut self.layers[layer as usize]
    }

    pub fn player_index(&self) -> Option<usize> {
        self.player_index
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player_index
            .and_then(|i| self.layers[Layer::Characters as usize].get(i))
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player_index
            .and_then(|i| self.layers[Layer::Characters as usize].get_mut(i))
    }

    /// All entities, level layer first, insertion order within a layer.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.layers.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.layers.iter_mut().flatten()
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
