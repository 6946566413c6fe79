use mg_core::input::{InputState, Key};

use crate::config::PlayerConfig;
use crate::entity::{Entity, PlayerState};
use crate::resources::{PlayerSkins, ANIM_PLAYER_IDLE, ANIM_PLAYER_RUN};

pub const LEFT_KEYS: &[Key] = &[Key::A, Key::Left];
pub const RIGHT_KEYS: &[Key] = &[Key::D, Key::Right];
pub const JUMP_KEYS: &[Key] = &[Key::K, Key::Space];

/// Player intent for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// -1, 0 or +1. Holding both directions cancels out.
    pub direction: f32,
    /// Jump key went down this frame.
    pub jump_pressed: bool,
}

impl FrameInput {
    pub fn from_input(input: &InputState) -> Self {
        let mut direction = 0.0;
        if input.any_held(LEFT_KEYS) {
            direction -= 1.0;
        }
        if input.any_held(RIGHT_KEYS) {
            direction += 1.0;
        }
        Self {
            direction,
            jump_pressed: input.any_just_pressed(JUMP_KEYS),
        }
    }
}

/// Runs the player's movement state machine for one frame.
///
/// Jumping is only legal from `Idle` and is checked before the idle/running
/// switch, so a jump pressed together with a direction still jumps.
pub fn update_player(
    player: &mut Entity,
    input: FrameInput,
    dt: f32,
    config: &PlayerConfig,
    skins: &PlayerSkins,
) {
    let Some(state) = player.player_state() else {
        return;
    };

    if input.direction != 0.0 {
        player.direction = input.direction;
    }

    let next = match state {
        PlayerState::Idle if input.jump_pressed => {
            player.velocity.y -= config.jump_impulse;
            PlayerState::Jumping
        }
        PlayerState::Idle if input.direction != 0.0 => {
            player.set_skin(skins.run_texture, ANIM_PLAYER_RUN);
            PlayerState::Running
        }
        PlayerState::Idle => {
            decelerate(player, config.deceleration_factor, dt);
            PlayerState::Idle
        }
        PlayerState::Running if input.direction == 0.0 => {
            player.set_skin(skins.idle_texture, ANIM_PLAYER_IDLE);
            PlayerState::Idle
        }
        other => other,
    };

    set_state(player, state, next);
}

/// Ends a jump once the collision pass has put the player back on the ground.
pub fn land(player: &mut Entity, skins: &PlayerSkins) {
    if player.player_state() == Some(PlayerState::Jumping) {
        player.set_skin(skins.idle_texture, ANIM_PLAYER_IDLE);
        set_state(player, PlayerState::Jumping, PlayerState::Idle);
    }
}

fn set_state(player: &mut Entity, from: PlayerState, to: PlayerState) {
    if let Some(data) = player.player_data_mut() {
        data.state = to;
    }
    if from != to {
        log::debug!("Player {from} -> {to}");
    }
}

/// Brakes toward zero without overshooting.
fn decelerate(player: &mut Entity, factor: f32, dt: f32) {
    if player.velocity.x == 0.0 {
        return;
    }
    let amount = -player.velocity.x.signum() * factor * player.acceleration.x.abs() * dt;
    if player.velocity.x.abs() < amount.abs() {
        player.velocity.x = 0.0;
    } else {
        player.velocity.x += amount;
    }
}
