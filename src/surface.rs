//! Display surface: one framebuffer paired with one panel.
//!
//! Components compose into the framebuffer and then call [`DisplaySurface::render`],
//! which always pushes the whole buffer and refreshes the panel. There is no
//! partial-region push.

use crate::error::Error;
use crate::framebuffer::{Colour, Framebuffer};
use crate::panel::PanelDriver;

pub struct DisplaySurface<P, B> {
    panel: P,
    framebuffer: Framebuffer<B>,
    initialized: bool,
}

impl<P, B> DisplaySurface<P, B>
where
    P: PanelDriver,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Build a surface whose framebuffer matches the panel's dimensions.
    pub fn new(panel: P, buffer: B) -> Result<Self, Error> {
        let framebuffer = Framebuffer::new(buffer, panel.width(), panel.height())?;
        Ok(Self {
            panel,
            framebuffer,
            initialized: false,
        })
    }

    /// One-time panel bring-up. Later calls are ignored.
    pub async fn initialize(&mut self) {
        if self.initialized {
            warn!("display surface already initialized");
            return;
        }
        info!("panel init");
        self.panel.init().await;
        self.initialized = true;
    }

    /// Clear the panel and the framebuffer together.
    pub async fn clear(&mut self) {
        self.ensure_initialized().await;
        self.panel.clear(Colour::White).await;
        self.framebuffer.fill(Colour::White);
    }

    /// Push the full framebuffer to the panel and refresh it.
    pub async fn render(&mut self) {
        self.ensure_initialized().await;
        let width = self.framebuffer.width();
        let height = self.framebuffer.height();
        debug!("render full frame {}x{}", width, height);
        self.panel
            .set_frame_memory(self.framebuffer.as_bytes(), 0, 0, width, height)
            .await;
        self.panel.display_frame().await;
    }

    async fn ensure_initialized(&mut self) {
        if !self.initialized {
            warn!("panel used before initialize, bringing it up now");
            self.initialize().await;
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn framebuffer(&self) -> &Framebuffer<B> {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer<B> {
        &mut self.framebuffer
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }
}

#[cfg(test)]
pub(crate) mod mock;
