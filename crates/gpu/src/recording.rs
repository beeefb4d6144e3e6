use std::cell::RefCell;
use std::rc::Rc;

use foundation::math::Mat4;
use scene::PinId;

use crate::renderer::{RenderBackend, RenderFrame};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnFrame {
    pub projection: Mat4,
    pub pins: Vec<PinId>,
}

/// Everything a `RecordingBackend` was asked to do.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderLog {
    pub state_resets: u64,
    pub depth_clears: u64,
    pub color_clears: u64,
    pub frames: Vec<DrawnFrame>,
    pub disposed: bool,
}

impl RenderLog {
    pub fn last_frame(&self) -> Option<&DrawnFrame> {
        self.frames.last()
    }
}

/// Backend that records calls instead of touching a GPU context.
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    log: Rc<RefCell<RenderLog>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the log that outlives the boxed backend.
    pub fn log(&self) -> Rc<RefCell<RenderLog>> {
        Rc::clone(&self.log)
    }
}

impl RenderBackend for RecordingBackend {
    fn reset_state(&mut self) {
        self.log.borrow_mut().state_resets += 1;
    }

    fn clear_depth(&mut self) {
        self.log.borrow_mut().depth_clears += 1;
    }

    fn draw(&mut self, frame: &RenderFrame) {
        self.log.borrow_mut().frames.push(DrawnFrame {
            projection: frame.camera.projection,
            pins: frame.commands.iter().map(|c| c.pin_id.clone()).collect(),
        });
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().disposed = true;
    }
}
