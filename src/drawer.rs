//! App drawer: a vertical list of apps with the selected row inverted.
//!
//! The first row slot of the region holds the title; app `i` sits in slot
//! `i + 1`. Rows do not scroll, so apps past the bottom of the panel are
//! clipped away by the framebuffer.

use crate::font::GLYPH_SIZE;
use crate::framebuffer::Colour;
use crate::panel::PanelDriver;
use crate::region::Region;
use crate::registry::{AppDescriptor, AppList};
use crate::surface::DisplaySurface;

pub const ROW_HEIGHT: i32 = 20;

/// Left inset of text inside a row.
pub const TEXT_INSET: i32 = 4;

const TITLE: &str = "Apps";

pub struct AppDrawer {
    region: Region,
    apps: AppList,
    selected: Option<usize>,
}

impl AppDrawer {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            apps: AppList::new(),
            selected: None,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn apps(&self) -> &[AppDescriptor] {
        &self.apps
    }

    /// Selected index; `None` while the list is empty.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_app(&self) -> Option<&AppDescriptor> {
        self.selected.and_then(|i| self.apps.get(i))
    }

    /// Replace the app list. Does not redraw.
    pub fn load(&mut self, apps: AppList) {
        self.apps = apps;
        self.selected = match self.apps.len() {
            0 => None,
            len => Some(self.selected.unwrap_or(0).min(len - 1)),
        };
    }

    /// Select `index`, clamped to the list, and redraw. No-op on an empty list.
    pub async fn select<P, B>(&mut self, index: usize, surface: &mut DisplaySurface<P, B>)
    where
        P: PanelDriver,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let Some(last) = self.apps.len().checked_sub(1) else {
            debug!("select on empty drawer ignored");
            return;
        };
        let index = index.min(last);
        self.selected = Some(index);
        debug!("selected app {}", index);
        self.redraw(surface).await;
    }

    pub async fn select_previous<P, B>(&mut self, surface: &mut DisplaySurface<P, B>)
    where
        P: PanelDriver,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let index = self.selected.unwrap_or(0).saturating_sub(1);
        self.select(index, surface).await;
    }

    pub async fn select_next<P, B>(&mut self, surface: &mut DisplaySurface<P, B>)
    where
        P: PanelDriver,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let index = self.selected.map_or(0, |i| i.saturating_add(1));
        self.select(index, surface).await;
    }

    /// Top edge of the row for app `index`.
    pub fn row_top(&self, index: usize) -> i32 {
        let slot = i32::try_from(index).unwrap_or(i32::MAX).saturating_add(1);
        self.region.y.saturating_add(ROW_HEIGHT.saturating_mul(slot))
    }

    pub async fn redraw<P, B>(&self, surface: &mut DisplaySurface<P, B>)
    where
        P: PanelDriver,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        self.compose(surface);
        surface.render().await;
    }

    /// Draw the drawer into the framebuffer without touching the panel.
    pub fn compose<P, B>(&self, surface: &mut DisplaySurface<P, B>)
    where
        P: PanelDriver,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let r = self.region;
        let text_dy = (ROW_HEIGHT - GLYPH_SIZE) / 2;
        let max_chars = ((r.w - 2 * TEXT_INSET) / GLYPH_SIZE).max(0) as usize;
        let fb = surface.framebuffer_mut();

        fb.fill_rect(r.x, r.y, r.w, r.h, Colour::White);
        fb.draw_text(TITLE, r.x + TEXT_INSET, r.y + text_dy, Colour::Black);

        for (i, app) in self.apps.iter().enumerate() {
            let y = self.row_top(i);
            let name = fit(&app.name, max_chars);
            if self.selected == Some(i) {
                fb.fill_rect(r.x, y, r.w, ROW_HEIGHT, Colour::Black);
                fb.draw_text(name, r.x + TEXT_INSET, y + text_dy, Colour::White);
            } else {
                fb.rect(r.x, y, r.w, ROW_HEIGHT, Colour::Black);
                fb.draw_text(name, r.x + TEXT_INSET, y + text_dy, Colour::Black);
            }
        }
    }
}

fn fit(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{glyph, glyph_pixel};
    use crate::surface::mock::{Call, surface};
    use embassy_futures::block_on;

    const DRAWER: Region = Region::new(0, 36, 128, 260);

    fn apps(names: &[&str]) -> AppList {
        names
            .iter()
            .map(|n| AppDescriptor::new(n, n).unwrap())
            .collect()
    }

    #[test]
    fn empty_drawer_has_no_selection_and_ignores_select() {
        let mut s = surface(128, 296);
        let mut d = AppDrawer::new(DRAWER);
        block_on(d.select(3, &mut s));
        assert_eq!(d.selected(), None);
        assert!(s.panel().calls.is_empty());
    }

    #[test]
    fn load_does_not_redraw_and_selects_first() {
        let s = surface(128, 296);
        let mut d = AppDrawer::new(DRAWER);
        d.load(apps(&["a", "b"]));
        assert_eq!(d.selected(), Some(0));
        assert!(s.panel().calls.is_empty());
    }

    #[test]
    fn reload_keeps_selection_in_range() {
        let mut s = surface(128, 296);
        let mut d = AppDrawer::new(DRAWER);
        d.load(apps(&["a", "b", "c"]));
        block_on(d.select(2, &mut s));
        d.load(apps(&["a"]));
        assert_eq!(d.selected(), Some(0));
        d.load(AppList::new());
        assert_eq!(d.selected(), None);
    }

    #[test]
    fn select_clamps_and_redraws() {
        let mut s = surface(128, 296);
        block_on(s.initialize());
        let mut d = AppDrawer::new(DRAWER);
        d.load(apps(&["a", "b", "c"]));

        block_on(d.select(10, &mut s));
        assert_eq!(d.selected(), Some(2));
        assert_eq!(d.selected_app().map(|a| a.name.as_str()), Some("c"));
        assert_eq!(s.panel().calls.last(), Some(&Call::DisplayFrame));

        block_on(d.select(0, &mut s));
        assert_eq!(d.selected(), Some(0));
    }

    #[test]
    fn previous_and_next_stop_at_the_ends() {
        let mut s = surface(128, 296);
        let mut d = AppDrawer::new(DRAWER);
        d.load(apps(&["a", "b"]));
        block_on(d.select_previous(&mut s));
        assert_eq!(d.selected(), Some(0));
        block_on(d.select_next(&mut s));
        block_on(d.select_next(&mut s));
        assert_eq!(d.selected(), Some(1));
    }

    #[test]
    fn selected_row_is_inverted() {
        let mut s = surface(128, 296);
        s.framebuffer_mut().fill(Colour::White);
        let mut d = AppDrawer::new(DRAWER);
        d.load(apps(&["Mail", "Maps", "Music"]));
        block_on(d.select(1, &mut s));

        let fb = s.framebuffer();
        let text_dy = (ROW_HEIGHT - GLYPH_SIZE) / 2;
        let m = glyph('M');
        for k in 0..3 {
            let top = d.row_top(k);
            let (bg, fg) = if k == 1 {
                (Colour::Black, Colour::White)
            } else {
                (Colour::White, Colour::Black)
            };
            // border
            assert_eq!(fb.pixel(0, top), Some(Colour::Black));
            assert_eq!(fb.pixel(127, top + ROW_HEIGHT - 1), Some(Colour::Black));
            // interior away from the text
            assert_eq!(fb.pixel(100, top + 2), Some(bg));
            assert_eq!(fb.pixel(2, top + ROW_HEIGHT - 3), Some(bg));
            // first glyph of the name
            for row in 0..GLYPH_SIZE {
                for col in 0..GLYPH_SIZE {
                    let px = fb.pixel(TEXT_INSET + col, top + text_dy + row);
                    let expected = if glyph_pixel(m, col, row) { fg } else { bg };
                    assert_eq!(px, Some(expected));
                }
            }
        }
    }

    #[test]
    fn rows_start_one_slot_below_region_top() {
        let d = AppDrawer::new(DRAWER);
        assert_eq!(d.row_top(0), 36 + ROW_HEIGHT);
        assert_eq!(d.row_top(2), 36 + 3 * ROW_HEIGHT);
    }

    #[test]
    fn overflowing_list_is_clipped_not_an_error() {
        let mut s = surface(128, 296);
        let mut d = AppDrawer::new(DRAWER);
        let names: Vec<String> = (0..16).map(|i| format!("App {}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        d.load(apps(&refs));
        block_on(d.select(15, &mut s));
        assert_eq!(d.selected(), Some(15));
        assert!(d.row_top(15) > 296);
    }

    #[test]
    fn long_names_are_cut_to_the_row() {
        assert_eq!(fit("abcdefghijklmnopqrstuvwx", 15), "abcdefghijklmno");
        assert_eq!(fit("short", 15), "short");
    }
}
