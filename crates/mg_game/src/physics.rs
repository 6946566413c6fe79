//! Explicit Euler integration for every entity in the store.

use crate::config::PhysicsConfig;
use crate::entity::{Entity, EntityStore};

/// Integrates all entities, level layer first.
///
/// `input_direction` is this frame's held direction, not the player's facing.
pub fn integrate(store: &mut EntityStore, input_direction: f32, dt: f32, config: &PhysicsConfig) {
    for entity in store.iter_mut() {
        integrate_entity(entity, input_direction, dt, config);
    }
}

pub fn integrate_entity(entity: &mut Entity, input_direction: f32, dt: f32, config: &PhysicsConfig) {
    if entity.dynamic {
        entity.velocity.y += config.gravity * dt;
    }

    if entity.is_player() {
        entity.velocity += input_direction * entity.acceleration * dt;
        // Clamping takes the sign from the input, not from the velocity.
        if entity.velocity.x.abs() > entity.max_speed_x {
            entity.velocity.x = input_direction * entity.max_speed_x;
        }
    }

    entity.position += entity.velocity * dt;
}
