//! Contract for the physical e-paper controller.
//!
//! The panel only accepts full-frame writes followed by a refresh. Calls are
//! assumed to complete synchronously from the caller's point of view; the
//! driver is responsible for bounding its own busy waits.

use crate::framebuffer::Colour;

#[allow(async_fn_in_trait)]
pub trait PanelDriver {
    /// Panel width in pixels.
    fn width(&self) -> u16;

    /// Panel height in pixels.
    fn height(&self) -> u16;

    /// Reset and configure the controller.
    async fn init(&mut self);

    /// Fill the controller's frame memory with `colour` and refresh.
    async fn clear(&mut self, colour: Colour);

    /// Copy a packed monochrome buffer into frame memory at (`x`, `y`).
    async fn set_frame_memory(&mut self, buffer: &[u8], x: u16, y: u16, width: u16, height: u16);

    /// Show the frame memory; returns once the refresh has finished.
    async fn display_frame(&mut self);
}

/// Byte-aligned frame memory window clipped to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub x: u16,
    pub y: u16,
    /// Last column, inclusive.
    pub x_end: u16,
    /// Last row, inclusive.
    pub y_end: u16,
    /// Bytes per row of the source buffer.
    pub stride: usize,
    /// Bytes per row that land inside the window.
    pub row_bytes: usize,
    pub rows: usize,
}

impl Window {
    /// Window for a `width` x `height` buffer placed at (`x`, `y`) on a
    /// `panel_width` x `panel_height` panel. `x` and `width` round down to
    /// whole bytes. `None` when nothing of the buffer is on the panel.
    pub fn clipped(
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        panel_width: u16,
        panel_height: u16,
    ) -> Option<Self> {
        let x = x & 0xF8;
        let width = width & 0xF8;
        if width == 0 || height == 0 || x >= panel_width || y >= panel_height {
            return None;
        }
        let x_end = x.saturating_add(width - 1).min(panel_width - 1);
        let y_end = y.saturating_add(height - 1).min(panel_height - 1);
        Some(Self {
            x,
            y,
            x_end,
            y_end,
            stride: usize::from(width / 8),
            row_bytes: (usize::from(x_end - x) + 1).div_ceil(8),
            rows: usize::from(y_end - y) + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_frame_window() {
        let w = Window::clipped(0, 0, 128, 296, 128, 296).unwrap();
        assert_eq!((w.x_end, w.y_end), (127, 295));
        assert_eq!((w.stride, w.row_bytes, w.rows), (16, 16, 296));
    }

    #[test]
    fn x_and_width_round_down_to_bytes() {
        let w = Window::clipped(13, 4, 21, 2, 128, 296).unwrap();
        assert_eq!((w.x, w.x_end), (8, 23));
        assert_eq!((w.stride, w.row_bytes), (2, 2));
    }

    #[test]
    fn window_past_the_edge_is_clipped() {
        let w = Window::clipped(120, 290, 32, 16, 128, 296).unwrap();
        assert_eq!((w.x_end, w.y_end), (127, 295));
        assert_eq!(w.stride, 4);
        assert_eq!(w.row_bytes, 1);
        assert_eq!(w.rows, 6);
    }

    #[test]
    fn huge_window_does_not_overflow() {
        let w = Window::clipped(64, 100, u16::MAX, u16::MAX, 128, 296).unwrap();
        assert_eq!((w.x_end, w.y_end), (127, 295));
        assert_eq!(w.row_bytes, 8);
        assert_eq!(w.rows, 196);
    }

    #[test]
    fn empty_or_off_panel_windows() {
        assert_eq!(Window::clipped(0, 0, 7, 10, 128, 296), None);
        assert_eq!(Window::clipped(0, 0, 8, 0, 128, 296), None);
        assert_eq!(Window::clipped(128, 0, 8, 8, 128, 296), None);
        assert_eq!(Window::clipped(0, 296, 8, 8, 128, 296), None);
    }
}
