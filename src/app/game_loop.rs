//! Simulation/render thread: update, draw both views, capture, publish

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::capture::FrameCapture;
use crate::game::{ControlState, GameEvent, PlayerId, World};
use crate::render::{Rasterizer, SceneRenderer};
use crate::store::SharedStore;
use crate::util::time::{TickClock, Timer};

/// Directly polled local controls, OR-ed with the remote flags every tick
pub trait LocalInput {
    fn poll(&mut self) -> [ControlState; 2];
}

/// No local keyboard: the server has no window
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessInput;

impl LocalInput for HeadlessInput {
    fn poll(&mut self) -> [ControlState; 2] {
        [ControlState::default(); 2]
    }
}

/// Everything the simulation thread owns
pub struct GameLoop<R, L> {
    world: World,
    scene: SceneRenderer,
    raster: R,
    local_input: L,
    capture: FrameCapture,
    store: Arc<SharedStore>,
}

impl<R, L> GameLoop<R, L>
where
    R: Rasterizer,
    L: LocalInput,
{
    pub fn new(
        world: World,
        scene: SceneRenderer,
        raster: R,
        local_input: L,
        capture: FrameCapture,
        store: Arc<SharedStore>,
    ) -> Self {
        Self {
            world,
            scene,
            raster,
            local_input,
            capture,
            store,
        }
    }

    #[cfg(test)]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// One tick: consume input, simulate, then render, capture and publish
    /// each player's view
    pub fn step(&mut self, dt: f32) -> Vec<GameEvent> {
        let remote = self.store.input_snapshot();
        let local = self.local_input.poll();
        let controls = [remote[0].merge(local[0]), remote[1].merge(local[1])];

        let events = self.world.update(dt, &controls);

        for player in PlayerId::ALL {
            self.scene.render_view(&mut self.raster, &self.world, player);
            match self.capture.capture(&self.raster) {
                Ok(frame) => self.store.publish_frame(player, frame, self.world.scores()),
                Err(e) => warn!(player = %player, error = %e, "Frame capture failed, keeping previous frame"),
            }
        }

        events
    }

    /// Tick until `stop` is raised, then release the renderer
    pub fn run(mut self, tick_rate: u32, stop: Arc<AtomicBool>) {
        info!(tick_rate, jpeg_quality = self.capture.quality(), "Simulation loop started");

        let mut clock = TickClock::new(tick_rate);
        let budget = clock.period();
        let mut ticks: u64 = 0;

        while !stop.load(Ordering::Acquire) {
            let dt = clock.wait();
            let timer = Timer::new();

            self.step(dt);
            ticks += 1;

            if timer.elapsed() > budget {
                debug!(tick = ticks, elapsed_us = timer.elapsed_micros(), "Tick over budget");
            }
        }

        info!(ticks, scores = ?self.world.scores(), "Simulation loop stopped");
        self.scene.release();
    }
}

impl<R, L> GameLoop<R, L>
where
    R: Rasterizer + Send + 'static,
    L: LocalInput + Send + 'static,
{
    /// Run the loop on its own named OS thread
    pub fn spawn(self, tick_rate: u32, stop: Arc<AtomicBool>) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("simulation".to_string())
            .spawn(move || self.run(tick_rate, stop))
    }
}
