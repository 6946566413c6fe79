//! Scripted keyboard input for headless runs.
//!
//! A replay lists which keys are held on each frame. Playing it feeds the
//! same `InputState` the windowed loop would, so jump edges come from keys
//! going down between frames rather than from a separate flag.

use mg_core::input::{InputState, Key};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::controller::FrameInput;
use crate::world::World;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub held: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    /// Run right, stop, jump in place, then walk back left.
    pub fn demo() -> Self {
        let frame = |held: &[Key], repeat: u32| ReplayFrame {
            held: held.to_vec(),
            repeat,
        };
        Self {
            fixed_dt: default_dt(),
            frames: vec![
                frame(&[Key::D], 90),
                frame(&[], 30),
                frame(&[Key::K], 1),
                frame(&[], 60),
                frame(&[Key::A], 60),
                frame(&[], 30),
            ],
        }
    }

    /// Held keys for every frame, with repeats expanded.
    pub fn expanded(&self) -> Vec<&[Key]> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.held.as_slice());
            }
        }
        out
    }
}

/// Presses and releases keys so that exactly `held` is down.
pub fn apply_held_keys(input: &mut InputState, held: &[Key]) {
    for &key in Key::ALL {
        if held.contains(&key) {
            input.key_down(key);
        } else {
            input.key_up(key);
        }
    }
}

/// Steps `world` once per replay frame. Returns the number of frames played.
#[allow(dead_code)]
pub fn play(world: &mut World, replay: &ReplaySequence) -> usize {
    play_with(world, replay, |_| {})
}

/// Like `play`, calling `after_step` once the world has finished each frame.
pub fn play_with(
    world: &mut World,
    replay: &ReplaySequence,
    mut after_step: impl FnMut(&World),
) -> usize {
    let mut input = InputState::new();
    let frames = replay.expanded();
    for held in &frames {
        apply_held_keys(&mut input, held);
        world.step(FrameInput::from_input(&input), replay.fixed_dt);
        input.end_frame();
        after_step(&*world);
    }
    frames.len()
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::PlayerState;
    use crate::level::{build_level, default_grid};
    use crate::resources::Resources;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "mg_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn default_world() -> World {
        let config = GameConfig::default();
        let res = Resources::builtin();
        let store = build_level(&default_grid(), &config.layout, &config.player, &res);
        World::new(store, config, res.player)
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "held": ["D"], "repeat": 3 },
                { "held": ["K"] },
                { "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded();
        assert_eq!(expanded.len(), 6);
        assert_eq!(expanded[0], &[Key::D]);
        assert_eq!(expanded[3], &[Key::K]);
        assert!(expanded[5].is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn held_jump_key_jumps_once() {
        let replay = ReplaySequence {
            fixed_dt: default_dt(),
            frames: vec![
                ReplayFrame {
                    held: Vec::new(),
                    repeat: 2,
                },
                ReplayFrame {
                    held: vec![Key::K],
                    repeat: 1,
                },
            ],
        };
        let mut world = default_world();
        play(&mut world, &replay);
        assert_eq!(world.player_state(), Some(PlayerState::Jumping));
        let vy = world.store().player().expect("player").velocity.y;
        assert!(vy < 0.0);

        // Keeping K held across frames does not produce a second edge.
        let mut input = InputState::new();
        apply_held_keys(&mut input, &[Key::K]);
        assert!(FrameInput::from_input(&input).jump_pressed);
        input.end_frame();
        apply_held_keys(&mut input, &[Key::K]);
        assert!(!FrameInput::from_input(&input).jump_pressed);
    }

    #[test]
    fn demo_replay_is_deterministic() {
        let replay = ReplaySequence::demo();
        let mut run_a = default_world();
        let mut run_b = default_world();
        let played = play(&mut run_a, &replay);
        play(&mut run_b, &replay);

        assert_eq!(played, 271);
        let a = run_a.store().player().expect("player");
        let b = run_b.store().player().expect("player");
        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity, b.velocity);
        assert_eq!(a.direction, -1.0);
        assert_eq!(run_a.player_state(), run_b.player_state());
    }
}
