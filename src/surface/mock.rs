//! Recording panel for host tests.
//!
//! Compiled into the library's unit tests and, through a `#[path]` module,
//! into the integration tests; the including module provides `Colour`,
//! `DisplaySurface` and `PanelDriver`.

use super::{Colour, DisplaySurface, PanelDriver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Init,
    Clear(Colour),
    SetFrameMemory { len: usize, x: u16, y: u16, width: u16, height: u16 },
    DisplayFrame,
}

pub struct RecordingPanel {
    pub width: u16,
    pub height: u16,
    pub calls: Vec<Call>,
    pub last_frame: Vec<u8>,
}

impl RecordingPanel {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
            last_frame: Vec::new(),
        }
    }

    /// Panel refreshes so far.
    pub fn refreshes(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::DisplayFrame).count()
    }
}

impl PanelDriver for RecordingPanel {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    async fn init(&mut self) {
        self.calls.push(Call::Init);
    }

    async fn clear(&mut self, colour: Colour) {
        self.calls.push(Call::Clear(colour));
    }

    async fn set_frame_memory(&mut self, buffer: &[u8], x: u16, y: u16, width: u16, height: u16) {
        self.last_frame = buffer.to_vec();
        self.calls.push(Call::SetFrameMemory {
            len: buffer.len(),
            x,
            y,
            width,
            height,
        });
    }

    async fn display_frame(&mut self) {
        self.calls.push(Call::DisplayFrame);
    }
}

/// Surface over a recording panel, framebuffer zeroed (all black).
pub fn surface(width: u16, height: u16) -> DisplaySurface<RecordingPanel, Vec<u8>> {
    let buffer = vec![0u8; (usize::from(width) * usize::from(height)).div_ceil(8)];
    DisplaySurface::new(RecordingPanel::new(width, height), buffer).unwrap()
}
