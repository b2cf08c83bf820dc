//! Sandbox config: settings, scene and a scripted input timeline in one TOML file.

use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;
use walker::{Action, CameraSettings, MotionIntents, SceneDef, WalkerSettings};

#[derive(Debug, Deserialize)]
pub struct SandboxConfig {
    #[serde(default)]
    pub run: RunOptions,
    #[serde(default)]
    pub walker: WalkerSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    pub scene: SceneDef,
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Fixed frame time in seconds.
    pub dt: f32,
    /// Log a state line every this many frames.
    pub report_every: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            report_every: 15,
        }
    }
}

/// A stretch of frames with the same held actions.
#[derive(Debug, Deserialize)]
pub struct ScriptStep {
    pub frames: u32,
    #[serde(default)]
    pub hold: Vec<String>,
    /// Pointer drag per frame while this step runs, as `[dx, dy]`.
    #[serde(default)]
    pub orbit: Option<[f32; 2]>,
    /// Vertical nudge applied once at the start of the step.
    #[serde(default)]
    pub nudge: Option<f32>,
}

impl ScriptStep {
    pub fn intents(&self) -> anyhow::Result<MotionIntents> {
        let mut intents = MotionIntents::empty();
        for name in &self.hold {
            intents.add(parse_action(name)?);
        }
        Ok(intents)
    }
}

impl SandboxConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: SandboxConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if !(config.run.dt.is_finite() && config.run.dt > 0.0) {
            bail!("run.dt must be positive, got {}", config.run.dt);
        }
        Ok(config)
    }
}

fn parse_action(name: &str) -> anyhow::Result<Action> {
    Ok(match name {
        "forward" => Action::Forward,
        "backward" => Action::Backward,
        "left" => Action::Left,
        "right" => Action::Right,
        other => bail!("unknown action `{other}`"),
    })
}
