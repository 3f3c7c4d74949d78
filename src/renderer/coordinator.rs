use std::sync::atomic::{AtomicUsize, Ordering};

/// Rectangle of pixels handed to a worker. Coordinates follow the image
/// convention with the origin at the top left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Hands out render blocks to worker threads. A single fetch_add is the
/// only synchronization the workers need.
pub struct RenderCoordinator {
    pub width: u32,
    pub height: u32,
    current_block: AtomicUsize,
    block_width: u32,
    block_height: u32,
    x_blocks: usize,
    y_blocks: usize,
}

impl RenderCoordinator {
    pub fn new(width: u32, height: u32) -> RenderCoordinator {
        let block_height = 50;
        let block_width = 50;
        let x_blocks = (f64::from(width) / f64::from(block_width)).ceil() as usize;
        let y_blocks = (f64::from(height) / f64::from(block_height)).ceil() as usize;
        RenderCoordinator {
            width,
            height,
            current_block: AtomicUsize::new(0),
            block_width,
            block_height,
            x_blocks,
            y_blocks,
        }
    }

    pub fn total_blocks(&self) -> usize {
        self.x_blocks * self.y_blocks
    }

    pub fn next_block(&self) -> Option<Block> {
        let block_i = self.current_block.fetch_add(1, Ordering::Relaxed);
        if block_i >= self.total_blocks() {
            return None;
        }
        let x_i = (block_i % self.x_blocks) as u32;
        let y_i = (block_i / self.x_blocks) as u32;
        let start_x = self.block_width * x_i;
        let end_x = (self.block_width * (x_i + 1)).min(self.width);
        let start_y = self.block_height * y_i;
        let end_y = (self.block_height * (y_i + 1)).min(self.height);
        Some(Block {
            left: start_x,
            top: start_y,
            width: end_x - start_x,
            height: end_y - start_y,
        })
    }
}
