use crate::animation::{AnimationCue, AnimationPlayer, CueTracker};
use crate::camera::CameraRig;
use crate::error::SceneError;
use crate::intent::InputSource;
use crate::physics::{RapierWorld, mask};
use crate::scene::Scene;
use crate::sensor::SensorRegistry;
use crate::settings::{CameraSettings, WalkerSettings};
use crate::walker::Walker;

use nalgebra::Point3;

/// Owns the world, the avatar and the camera, and advances them one frame at a time.
pub struct Simulation {
    world: RapierWorld,
    sensors: SensorRegistry,
    walker: Walker,
    camera: CameraRig,
    cues: CueTracker,
}

impl Simulation {
    pub fn new(
        scene: Scene,
        walker_settings: WalkerSettings,
        camera_settings: CameraSettings,
    ) -> Result<Self, SceneError> {
        walker_settings.validate()?;
        camera_settings.validate()?;

        let Scene {
            mut world,
            sensors,
            avatar,
            spawn,
            ..
        } = scene;

        let mut walker = Walker::new(
            avatar,
            Point3::new(spawn.x, spawn.y, spawn.z.unwrap_or(0.0)),
            spawn.heading,
            walker_settings,
        );
        if spawn.z.is_none()
            && walker
                .spawn_on_ground(&world, spawn.x, spawn.y, mask::WALKABLE)
                .is_none()
        {
            log::warn!("no ground below spawn ({}, {})", spawn.x, spawn.y);
        }
        world.set_body_position(avatar, walker.position());

        let camera = CameraRig::new(walker.position(), camera_settings);

        Ok(Self {
            world,
            sensors,
            walker,
            camera,
            cues: CueTracker::default(),
        })
    }

    /// Advance one frame: walker, then avatar body sync, then camera.
    pub fn step(
        &mut self,
        dt: f32,
        input: &impl InputSource,
        player: &mut impl AnimationPlayer,
    ) -> AnimationCue {
        let cue = self
            .walker
            .update(&self.world, &self.sensors, dt, input.intents());
        self.world
            .set_body_position(self.walker.body(), self.walker.position());
        self.camera
            .update(&self.world, &self.sensors, &self.walker, dt);
        self.cues.apply(cue, player);
        cue
    }

    /// Debug vertical nudge, kept in sync with the physics body.
    pub fn nudge_vertical(&mut self, dz: f32) {
        self.walker.nudge_vertical(dz);
        self.world
            .set_body_position(self.walker.body(), self.walker.position());
    }

    pub fn walker(&self) -> &Walker {
        &self.walker
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    pub fn world(&self) -> &RapierWorld {
        &self.world
    }

    pub fn sensors(&self) -> &SensorRegistry {
        &self.sensors
    }
}
