use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::sampler::Sampling;
use crate::sink::PixelSink;
use crate::stats;
use crate::tracer::WhittedTracer;

mod coordinator;
mod worker;

pub use self::coordinator::{Block, RenderCoordinator};
use self::worker::RenderWorker;

#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    pub threads: usize,
    pub sampling: Sampling,
    /// Log progress after every this many finished blocks. Zero disables
    /// progress reporting.
    pub report_interval: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get_physical().max(1),
            sampling: Sampling::default(),
            report_interval: 16,
        }
    }
}

/// Drives a full render: checks configuration, splits the image into
/// blocks, fans the blocks out to worker threads and writes finished
/// blocks to the pixel sink.
///
/// Camera and sink start unset so scenes can be staged incrementally;
/// `render` fails with the first missing piece instead of guessing
/// defaults.
pub struct Renderer<S: PixelSink> {
    tracer: Arc<WhittedTracer>,
    camera: Option<Camera>,
    sink: Option<S>,
    config: RenderConfig,
}

impl<S: PixelSink> Renderer<S> {
    pub fn new(tracer: WhittedTracer) -> Renderer<S> {
        Renderer {
            tracer: Arc::new(tracer),
            camera: None,
            sink: None,
            config: RenderConfig::default(),
        }
    }

    pub fn set_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn set_sink(mut self, sink: S) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn set_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Renders the scene into the sink and flushes it. Returns the sink
    /// so callers can inspect or reuse it.
    pub fn render(&mut self) -> Result<S> {
        let camera = self
            .camera
            .clone()
            .ok_or(Error::MissingResource("camera"))?;
        if !camera.has_viewplane() {
            return Err(Error::MissingResource("view-plane size"));
        }
        if !camera.has_distance() {
            return Err(Error::MissingResource("view-plane distance"));
        }
        let mut sink = self
            .sink
            .take()
            .ok_or(Error::MissingResource("pixel sink"))?;

        stats::new_render(&self.tracer.scene().name);
        stats::start_render();
        log::info!(
            "rendering '{}' at {}x{} with {} threads",
            self.tracer.scene().name,
            sink.width(),
            sink.height(),
            self.config.threads
        );

        let coordinator = Arc::new(RenderCoordinator::new(sink.width(), sink.height()));
        let (result_tx, result_rx) = mpsc::channel();
        let mut handles: Vec<JoinHandle<()>> = Vec::new();
        for _ in 0..self.config.threads.max(1) {
            let worker = RenderWorker::new(
                self.tracer.clone(),
                camera.clone(),
                self.config.sampling,
                coordinator.clone(),
                result_tx.clone(),
            );
            handles.push(thread::spawn(move || worker.run()));
        }
        // Drop the original sender so the receiver disconnects once the
        // last worker finishes.
        drop(result_tx);

        let total_blocks = coordinator.total_blocks();
        let mut done_blocks = 0;
        for (block, colors) in result_rx {
            for h in 0..block.height {
                for w in 0..block.width {
                    let color = colors[(h * block.width + w) as usize];
                    sink.set_pixel(block.left + w, block.top + h, color);
                }
            }
            done_blocks += 1;
            if self.config.report_interval != 0 && done_blocks % self.config.report_interval == 0
            {
                log::debug!("rendered {}/{} blocks", done_blocks, total_blocks);
            }
        }
        let mut worker_panicked = false;
        for handle in handles {
            if handle.join().is_err() {
                log::error!("render worker panicked");
                worker_panicked = true;
            }
        }
        stats::stop_render();
        if worker_panicked {
            return Err(Error::WorkerPanicked);
        }
        sink.flush()?;
        Ok(sink)
    }
}
