//! Packed monochrome framebuffer.
//!
//! 1 bit per pixel, row-major, most significant bit first within each byte.
//! A set bit is white (the panel's erased state), a cleared bit is black.
//!
//! Every drawing operation clips to the buffer: coordinates may be negative
//! or past the edge and nothing outside `[0, width) x [0, height)` is touched.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::error::Error;
use crate::font::{GLYPH_SIZE, glyph, glyph_pixel};
use crate::region::Region;

/// Two-valued pixel colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Colour {
    White,
    Black,
}

impl Colour {
    /// Byte with all eight pixels in this colour.
    pub const fn fill_byte(self) -> u8 {
        match self {
            Colour::White => 0xFF,
            Colour::Black => 0x00,
        }
    }
}

impl From<BinaryColor> for Colour {
    fn from(c: BinaryColor) -> Self {
        match c {
            BinaryColor::On => Colour::Black,
            BinaryColor::Off => Colour::White,
        }
    }
}

/// Bytes needed for a `width` x `height` bitmap.
pub const fn buffer_len(width: u16, height: u16) -> usize {
    (width as usize * height as usize).div_ceil(8)
}

/// Monochrome bitmap over a caller-provided backing store.
pub struct Framebuffer<B> {
    buffer: B,
    width: u16,
    height: u16,
}

impl<B> Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap `buffer` as a `width` x `height` bitmap.
    ///
    /// The backing store may be larger than needed; only the first
    /// [`buffer_len`] bytes are used.
    pub fn new(buffer: B, width: u16, height: u16) -> Result<Self, Error> {
        let required = buffer_len(width, height);
        let actual = buffer.as_ref().len();
        if actual < required {
            return Err(Error::BufferTooSmall { required, actual });
        }
        Ok(Self {
            buffer,
            width,
            height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Packed pixel data, exactly [`buffer_len`] bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[..buffer_len(self.width, self.height)]
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        let len = buffer_len(self.width, self.height);
        &mut self.buffer.as_mut()[..len]
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < i32::from(self.width) && y < i32::from(self.height)
    }

    /// Colour at (`x`, `y`), or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Colour> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let bit = 0x80 >> (idx % 8);
        Some(if self.as_bytes()[idx / 8] & bit != 0 {
            Colour::White
        } else {
            Colour::Black
        })
    }

    /// Set one pixel; out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, colour: Colour) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let bit = 0x80 >> (idx % 8);
        let byte = &mut self.bytes_mut()[idx / 8];
        match colour {
            Colour::White => *byte |= bit,
            Colour::Black => *byte &= !bit,
        }
    }

    /// Set every pixel.
    pub fn fill(&mut self, colour: Colour) {
        self.bytes_mut().fill(colour.fill_byte());
    }

    /// Fill the rectangle at (`x`, `y`) of size `w` x `h`, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Colour) {
        if w <= 0 || h <= 0 {
            return;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(i32::from(self.width));
        let y1 = y.saturating_add(h).min(i32::from(self.height));
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, colour);
            }
        }
    }

    /// One-pixel border of the rectangle at (`x`, `y`) of size `w` x `h`.
    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Colour) {
        if w <= 0 || h <= 0 {
            return;
        }
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);
        self.hline(x, y, w, colour);
        self.hline(x, bottom, w, colour);
        self.vline(x, y, h, colour);
        self.vline(right, y, h, colour);
    }

    /// Horizontal segment of `length` pixels starting at (`x`, `y`).
    pub fn hline(&mut self, x: i32, y: i32, length: i32, colour: Colour) {
        self.fill_rect(x, y, length, 1, colour);
    }

    fn vline(&mut self, x: i32, y: i32, length: i32, colour: Colour) {
        self.fill_rect(x, y, 1, length, colour);
    }

    /// Draw `text` left to right in 8x8 glyphs with the top-left corner at
    /// (`x`, `y`). Only glyph pixels are painted; the background is left as is.
    /// No wrapping: anything past the right edge is clipped.
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, colour: Colour) {
        self.draw_text_within(text, x, y, colour, self.bounds());
    }

    /// [`draw_text`](Self::draw_text) that also drops every pixel outside `clip`.
    pub fn draw_text_within(&mut self, text: &str, x: i32, y: i32, colour: Colour, clip: Region) {
        let mut cx = x;
        for c in text.chars() {
            if cx >= clip.right() {
                break;
            }
            if cx > clip.x.saturating_sub(GLYPH_SIZE) {
                let g = glyph(c);
                for row in 0..GLYPH_SIZE {
                    for col in 0..GLYPH_SIZE {
                        let (px, py) = (cx + col, y.saturating_add(row));
                        if glyph_pixel(g, col, row) && clip.contains(px, py) {
                            self.set_pixel(px, py, colour);
                        }
                    }
                }
            }
            cx = cx.saturating_add(GLYPH_SIZE);
        }
    }

    fn bounds(&self) -> Region {
        Region::new(0, 0, i32::from(self.width), i32::from(self.height))
    }
}

impl<B> OriginDimensions for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        Size::new(u32::from(self.width), u32::from(self.height))
    }
}

impl<B> DrawTarget for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    const W: u16 = 16;
    const H: u16 = 8;

    fn fb() -> Framebuffer<[u8; 16]> {
        let mut fb = Framebuffer::new([0u8; 16], W, H).unwrap();
        fb.fill(Colour::White);
        fb
    }

    fn black_pixels<B: AsRef<[u8]> + AsMut<[u8]>>(fb: &Framebuffer<B>) -> usize {
        let mut n = 0;
        for y in 0..i32::from(fb.height()) {
            for x in 0..i32::from(fb.width()) {
                if fb.pixel(x, y) == Some(Colour::Black) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn rejects_short_backing_store() {
        let err = Framebuffer::new([0u8; 15], W, H).err();
        assert_eq!(err, Some(Error::BufferTooSmall { required: 16, actual: 15 }));
    }

    #[test]
    fn buffer_len_rounds_up() {
        assert_eq!(buffer_len(128, 296), 4736);
        assert_eq!(buffer_len(3, 3), 2);
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut fb = fb();
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
        fb.fill(Colour::Black);
        assert!(fb.as_bytes().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn pixels_are_msb_first_row_major() {
        let mut fb = fb();
        fb.set_pixel(0, 0, Colour::Black);
        assert_eq!(fb.as_bytes()[0], 0x7F);
        fb.set_pixel(9, 1, Colour::Black);
        // row 1 starts at byte 2; x=9 is bit 1 of byte 3
        assert_eq!(fb.as_bytes()[3], 0b1011_1111);
        fb.set_pixel(9, 1, Colour::White);
        assert_eq!(fb.as_bytes()[3], 0xFF);
    }

    #[test]
    fn out_of_range_pixel_is_ignored() {
        let mut fb = fb();
        fb.set_pixel(-1, 0, Colour::Black);
        fb.set_pixel(16, 0, Colour::Black);
        fb.set_pixel(0, 8, Colour::Black);
        assert_eq!(black_pixels(&fb), 0);
        assert_eq!(fb.pixel(16, 0), None);
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut fb = fb();
        fb.fill_rect(-4, -4, 6, 6, Colour::Black);
        assert_eq!(black_pixels(&fb), 4);
        assert_eq!(fb.pixel(1, 1), Some(Colour::Black));
        assert_eq!(fb.pixel(2, 1), Some(Colour::White));

        fb.fill_rect(14, 6, 100, 100, Colour::Black);
        assert_eq!(black_pixels(&fb), 8);
    }

    #[test]
    fn degenerate_rects_are_no_ops() {
        let mut fb = fb();
        fb.fill_rect(2, 2, 0, 4, Colour::Black);
        fb.fill_rect(2, 2, 4, -1, Colour::Black);
        fb.rect(2, 2, -3, 3, Colour::Black);
        fb.hline(2, 2, 0, Colour::Black);
        fb.fill_rect(i32::MAX, i32::MAX, i32::MAX, i32::MAX, Colour::Black);
        assert_eq!(black_pixels(&fb), 0);
    }

    #[test]
    fn rect_draws_border_only() {
        let mut fb = fb();
        fb.rect(1, 1, 5, 4, Colour::Black);
        // perimeter of a 5x4 box
        assert_eq!(black_pixels(&fb), 14);
        assert_eq!(fb.pixel(1, 1), Some(Colour::Black));
        assert_eq!(fb.pixel(5, 4), Some(Colour::Black));
        assert_eq!(fb.pixel(3, 2), Some(Colour::White));
    }

    #[test]
    fn rect_partially_outside_keeps_visible_edges() {
        let mut fb = fb();
        fb.rect(-2, 2, 6, 3, Colour::Black);
        // left edge is off-screen; top and bottom rows run x=0..=3, right edge at x=3
        assert_eq!(fb.pixel(0, 2), Some(Colour::Black));
        assert_eq!(fb.pixel(3, 3), Some(Colour::Black));
        assert_eq!(fb.pixel(0, 3), Some(Colour::White));
        assert_eq!(black_pixels(&fb), 9);
    }

    #[test]
    fn hline_is_one_row() {
        let mut fb = fb();
        fb.hline(4, 3, 8, Colour::Black);
        assert_eq!(black_pixels(&fb), 8);
        assert!((4..12).all(|x| fb.pixel(x, 3) == Some(Colour::Black)));
    }

    #[test]
    fn draw_text_paints_glyph_pixels_only() {
        let mut fb = fb();
        fb.draw_text("A", 0, 0, Colour::Black);
        let g = glyph('A');
        for row in 0..8 {
            for col in 0..8 {
                let expected = if glyph_pixel(g, col, row) {
                    Colour::Black
                } else {
                    Colour::White
                };
                assert_eq!(fb.pixel(col, row), Some(expected));
            }
        }
    }

    #[test]
    fn draw_text_clips_instead_of_wrapping() {
        let mut fb = fb();
        fb.draw_text("XXXX", 4, 0, Colour::Black);
        assert_eq!(fb.pixel(4, 0), Some(Colour::Black));
        // glyphs past the right edge do not wrap back to column 0
        assert!((0..4).all(|x| (0..8).all(|y| fb.pixel(x, y) == Some(Colour::White))));
        fb.draw_text("ABC", -20, -20, Colour::Black);
        fb.draw_text("ABC", 100, 100, Colour::Black);
    }

    #[test]
    fn draw_text_within_stops_at_the_clip_edges() {
        let mut fb = fb();
        let clip = Region::new(2, 2, 10, 4);
        fb.draw_text_within("MMMM", 0, 0, Colour::Black, clip);

        for y in 0..i32::from(H) {
            for x in 0..i32::from(W) {
                if !clip.contains(x, y) {
                    assert_eq!(fb.pixel(x, y), Some(Colour::White), "({}, {})", x, y);
                }
            }
        }
        // 'M' has ink in its third row, which lands inside the clip
        assert!((2..12).any(|x| fb.pixel(x, 2) == Some(Colour::Black)));
    }

    #[test]
    fn embedded_graphics_primitives_draw_through() {
        let mut fb = fb();
        Rectangle::new(Point::new(-1, -1), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(black_pixels(&fb), 4);
        assert_eq!(fb.size(), Size::new(16, 8));
    }
}
