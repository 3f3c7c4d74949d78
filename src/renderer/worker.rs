use std::sync::{mpsc::Sender, Arc};

use crate::camera::Camera;
use crate::color::Color;
use crate::sampler::{PixelSampler, Sampling};
use crate::tracer::WhittedTracer;

use super::coordinator::{Block, RenderCoordinator};

pub struct RenderWorker {
    tracer: Arc<WhittedTracer>,
    camera: Camera,
    sampling: Sampling,
    coordinator: Arc<RenderCoordinator>,
    result_tx: Sender<(Block, Vec<Color>)>,
}

impl RenderWorker {
    pub(super) fn new(
        tracer: Arc<WhittedTracer>,
        camera: Camera,
        sampling: Sampling,
        coordinator: Arc<RenderCoordinator>,
        result_tx: Sender<(Block, Vec<Color>)>,
    ) -> RenderWorker {
        RenderWorker {
            tracer,
            camera,
            sampling,
            coordinator,
            result_tx,
        }
    }

    /// Pulls blocks from the coordinator until they run out. Each pixel
    /// is sampled independently, so blocks can be rendered in any order
    /// by any number of workers.
    pub fn run(&self) {
        let (nx, ny) = (self.coordinator.width, self.coordinator.height);
        let sampler = PixelSampler::new(&self.camera, &self.tracer, self.sampling);
        while let Some(block) = self.coordinator.next_block() {
            let mut colors = Vec::with_capacity((block.width * block.height) as usize);
            for h in 0..block.height {
                for w in 0..block.width {
                    colors.push(sampler.pixel_color(nx, ny, block.left + w, block.top + h));
                }
            }
            if self.result_tx.send((block, colors)).is_err() {
                // Receiver dropped mid-render, nobody wants the rest.
                return;
            }
        }
    }
}
