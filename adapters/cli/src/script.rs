//! Scripted input replayed by the headless binary.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use soulkeeper_core::{InputButton, InputFrame, InputSignal};
use thiserror::Error;

const DEFAULT_FRAME_MS: u64 = 16;

/// Reasons an input script was rejected.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The document is not valid TOML or does not match the expected layout.
    #[error("failed to parse input script: {0}")]
    Parse(#[from] toml::de::Error),
    /// A frame asked to be replayed zero times.
    #[error("frame {index} repeats zero times")]
    ZeroRepeat {
        /// Position of the offending frame in the script.
        index: usize,
    },
}

/// One `[[frame]]` table of a script.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptFrame {
    /// Frame duration in milliseconds.
    #[serde(default = "default_dt_ms")]
    pub dt_ms: u64,
    /// Signals pressed during the frame.
    #[serde(default)]
    pub pressed: Vec<InputSignal>,
    /// Buttons held at the end of the frame.
    #[serde(default)]
    pub held: Vec<InputButton>,
    /// Number of consecutive times the frame is replayed.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_dt_ms() -> u64 {
    DEFAULT_FRAME_MS
}

fn default_repeat() -> u32 {
    1
}

/// Ordered list of input frames.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default, rename = "frame")]
    frames: Vec<ScriptFrame>,
}

impl Script {
    /// Parses and validates a TOML script.
    pub fn from_toml_str(contents: &str) -> Result<Self, ScriptError> {
        let script: Self = toml::from_str(contents)?;
        if let Some(index) = script.frames.iter().position(|frame| frame.repeat == 0) {
            return Err(ScriptError::ZeroRepeat { index });
        }
        Ok(script)
    }

    /// Reads and validates the script stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid input script at {}", path.display()))
    }

    /// Frames as written, before repeats are expanded.
    #[must_use]
    pub fn frames(&self) -> &[ScriptFrame] {
        &self.frames
    }

    /// Expands repeats into the frame sequence a session consumes.
    ///
    /// Every repetition replays the whole frame, pressed signals included.
    pub fn replay(&self) -> impl Iterator<Item = (Duration, InputFrame)> + '_ {
        self.frames.iter().flat_map(|frame| {
            let input = InputFrame {
                pressed: frame.pressed.clone(),
                held: frame.held.clone(),
            };
            let dt = Duration::from_millis(frame.dt_ms);
            (0..frame.repeat).map(move |_| (dt, input.clone()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_default_their_timing_and_inputs() {
        let script = Script::from_toml_str(
            r#"
                [[frame]]

                [[frame]]
                dt_ms = 100
                pressed = ["confirm", { change_focus = -1.0 }]
                held = ["confirm"]
            "#,
        )
        .expect("script");

        let frames: Vec<_> = script.replay().collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], (Duration::from_millis(16), InputFrame::idle()));
        assert_eq!(frames[1].0, Duration::from_millis(100));
        assert_eq!(
            frames[1].1.pressed,
            vec![InputSignal::Confirm, InputSignal::ChangeFocus(-1.0)]
        );
        assert!(frames[1].1.is_held(InputButton::Confirm));
    }

    #[test]
    fn repeats_expand_in_place() {
        let script = Script::from_toml_str(
            r#"
                [[frame]]
                pressed = ["right"]
                repeat = 3

                [[frame]]
                dt_ms = 500
            "#,
        )
        .expect("script");

        let frames: Vec<_> = script.replay().collect();
        assert_eq!(frames.len(), 4);
        assert!(frames[..3]
            .iter()
            .all(|(_, input)| input.pressed == vec![InputSignal::Right]));
        assert_eq!(frames[3].0, Duration::from_millis(500));
    }

    #[test]
    fn empty_scripts_are_valid() {
        let script = Script::from_toml_str("").expect("empty script");
        assert!(script.frames().is_empty());
        assert_eq!(script.replay().count(), 0);
    }

    #[test]
    fn invalid_scripts_are_rejected() {
        assert!(matches!(
            Script::from_toml_str("[[frame]]\nrepeat = 0"),
            Err(ScriptError::ZeroRepeat { index: 0 })
        ));
        assert!(matches!(
            Script::from_toml_str("[[frame]]\npressed = [\"jump\"]"),
            Err(ScriptError::Parse(_))
        ));
    }
}
