//! Status bar: notification text on the left, clock on the right, separator
//! line along the bottom.

use core::fmt::Write;

use heapless::String;

use crate::font::GLYPH_SIZE;
use crate::framebuffer::Colour;
use crate::panel::PanelDriver;
use crate::region::Region;
use crate::surface::DisplaySurface;
use crate::time::DateTime;

/// Shown in place of the clock when no valid time is known.
pub const SENTINEL_TIME: &str = "--:--";

/// Inner margin of the status bar.
pub const PADDING: i32 = 2;

/// Width in pixels given to the notification text.
pub const NOTIFICATION_WIDTH: i32 = 80;

/// Characters per notification line.
pub const NOTIFICATION_CHUNK: usize = (NOTIFICATION_WIDTH / GLYPH_SIZE) as usize;

/// Horizontal offset of the clock inside the region.
pub const TIME_LABEL_OFFSET: i32 = 86;

/// Longest notification kept; extra characters are dropped.
pub const MAX_NOTIFICATION_LEN: usize = 128;

const TIME_LABEL_LEN: usize = 5;

pub struct StatusBar {
    region: Region,
    notification: String<MAX_NOTIFICATION_LEN>,
    time_label: String<TIME_LABEL_LEN>,
}

impl StatusBar {
    pub fn new(region: Region) -> Self {
        let mut time_label = String::new();
        let _ = time_label.push_str(SENTINEL_TIME);
        Self {
            region,
            notification: String::new(),
            time_label,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn notification(&self) -> &str {
        &self.notification
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    /// Replace the notification. Visible after the next [`redraw`](Self::redraw).
    pub fn set_notification(&mut self, text: &str) {
        self.notification.clear();
        for c in text.chars() {
            if self.notification.push(c).is_err() {
                debug!("notification truncated to {} bytes", MAX_NOTIFICATION_LEN);
                break;
            }
        }
    }

    /// Store `time` as "HH:MM", or the sentinel when absent.
    pub fn set_time(&mut self, time: Option<DateTime>) {
        self.time_label.clear();
        match time {
            Some(t) => {
                let _ = write!(self.time_label, "{:02}:{:02}", t.hour(), t.minute());
            }
            None => {
                let _ = self.time_label.push_str(SENTINEL_TIME);
            }
        }
    }

    /// Number of notification lines that fit above the separator.
    pub fn max_lines(&self) -> usize {
        let usable = self.region.h - 2 * PADDING;
        if usable <= 0 {
            return 0;
        }
        (usable as usize).div_ceil(GLYPH_SIZE as usize)
    }

    /// Compose the bar into the surface's framebuffer and render.
    pub async fn redraw<P, B>(&self, surface: &mut DisplaySurface<P, B>)
    where
        P: PanelDriver,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        self.compose(surface);
        surface.render().await;
    }

    /// Draw the bar into the framebuffer without touching the panel.
    pub fn compose<P, B>(&self, surface: &mut DisplaySurface<P, B>)
    where
        P: PanelDriver,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let r = self.region;
        let fb = surface.framebuffer_mut();

        fb.fill_rect(r.x, r.y, r.w, r.h, Colour::White);
        fb.hline(r.x, r.bottom() - PADDING, r.w, Colour::Black);

        let max_lines = self.max_lines();
        if chunks(&self.notification, NOTIFICATION_CHUNK).count() > max_lines {
            debug!("notification truncated to {} lines", max_lines);
        }
        for (i, line) in chunks(&self.notification, NOTIFICATION_CHUNK)
            .take(max_lines)
            .enumerate()
        {
            let y = r.y + PADDING + i as i32 * GLYPH_SIZE;
            fb.draw_text_within(line, r.x + PADDING, y, Colour::Black, r);
        }

        fb.draw_text_within(
            &self.time_label,
            r.x + TIME_LABEL_OFFSET,
            r.y + PADDING,
            Colour::Black,
            r,
        );
    }
}

/// Split `text` into pieces of at most `size` characters.
pub fn chunks(text: &str, size: usize) -> impl Iterator<Item = &str> {
    let mut rest = text;
    core::iter::from_fn(move || {
        if rest.is_empty() || size == 0 {
            return None;
        }
        let end = rest
            .char_indices()
            .nth(size)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        rest = tail;
        Some(head)
    })
}
