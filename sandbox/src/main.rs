//! Headless driver: loads a scene file and plays its input script through the simulation.
//!
//! Usage: `sandbox [path/to/scene.toml]` (defaults to `scenes/terrain_with_hole.toml`).
//! Set `RUST_LOG=debug` to see state transitions and camera moves.

mod script;

use std::path::PathBuf;

use anyhow::Context;
use walker::{AnimationCue, AnimationPlayer, Simulation};

use crate::script::SandboxConfig;

/// Stands in for the clip player: just reports what would be played.
struct LogPlayer;

impl AnimationPlayer for LogPlayer {
    fn play(&mut self, cue: AnimationCue) {
        log::info!("animation: {cue:?}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/scenes/terrain_with_hole.toml")));

    let config = SandboxConfig::load(&path)?;
    let scene = config.scene.build().context("failed to build scene")?;
    let mut sim = Simulation::new(scene, config.walker, config.camera)
        .context("failed to start simulation")?;

    let dt = config.run.dt;
    let report_every = config.run.report_every.max(1);
    let mut player = LogPlayer;
    let mut frame: u32 = 0;

    for step in &config.script {
        let intents = step.intents()?;
        if let Some(dz) = step.nudge {
            sim.nudge_vertical(dz);
        }

        for _ in 0..step.frames {
            if let Some([dx, dy]) = step.orbit {
                sim.camera_mut().orbit(dx, dy, dt);
            }
            sim.step(dt, &intents, &mut player);

            frame += 1;
            if frame % report_every == 0 {
                let walker = sim.walker();
                log::info!(
                    "frame {frame}: pos ({:.2}, {:.2}, {:.2}) heading {:.1} {:?} | camera ({:.2}, {:.2}, {:.2})",
                    walker.position().x,
                    walker.position().y,
                    walker.position().z,
                    walker.heading(),
                    walker.status(),
                    sim.camera().position().x,
                    sim.camera().position().y,
                    sim.camera().position().z,
                );
            }
        }
        if step.orbit.is_some() {
            sim.camera_mut().release();
        }
    }

    let walker = sim.walker();
    println!(
        "finished after {frame} frames at ({:.2}, {:.2}, {:.2}), status {:?}",
        walker.position().x,
        walker.position().y,
        walker.position().z,
        walker.status()
    );
    Ok(())
}
