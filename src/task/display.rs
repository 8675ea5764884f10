//! Display management task
//! Owns the e-Paper surface and every region drawn on it; commands are
//! handled one at a time so renders never interleave

use defmt::{error, info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Text};
use epaper_launcher::scheduler::publish;
use epaper_launcher::{
    AppDrawer, AppList, AppRegistry, Colour, DisplaySurface, Framebuffer, JsonRegistry, Notices,
    StatusBar, SystemState,
};

use crate::config::{
    APP_DRAWER_REGION, APP_REGISTRY_JSON, EpdPins, FRAME_BUFFER_SIZE, GREETING, STATUS_BAR_REGION,
};
use crate::epd_2in9::Epd2in9;

/// Queued display commands; senders wait when it is full
const DISPLAY_QUEUE_SIZE: usize = 4;

/// How long the boot splash stays up
const SPLASH_DURATION: Duration = Duration::from_secs(2);

/// Work for the display task
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum DisplayCommand {
    SelectPrevious,
    SelectNext,
    ReloadApps,
    /// Show the result of a refresh in the status bar
    Publish(SystemState),
}

static DISPLAY_CHANNEL: Channel<CriticalSectionRawMutex, DisplayCommand, DISPLAY_QUEUE_SIZE> =
    Channel::new();

/// Queue a command for the display task
pub async fn send_display_command(command: DisplayCommand) {
    DISPLAY_CHANNEL.sender().send(command).await;
}

type Surface = DisplaySurface<Epd2in9<'static>, &'static mut [u8; FRAME_BUFFER_SIZE]>;

/// Display handler task - boots the UI, then serves display commands
#[embassy_executor::task]
pub async fn display_handler(
    epd_pins: EpdPins<'static>,
    frame_buffer: &'static mut [u8; FRAME_BUFFER_SIZE],
) -> ! {
    info!("Display handler task started");

    let epd = Epd2in9::new(epd_pins);
    let mut surface: Surface = match DisplaySurface::new(epd, frame_buffer) {
        Ok(surface) => surface,
        Err(e) => {
            error!("Display setup failed: {}", e);
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        }
    };

    info!("EPD init");
    surface.initialize().await;
    info!("Clear display");
    surface.clear().await;

    draw_splash(surface.framebuffer_mut());
    surface.render().await;
    Timer::after(SPLASH_DURATION).await;

    let mut status_bar = StatusBar::new(STATUS_BAR_REGION);
    let mut drawer = AppDrawer::new(APP_DRAWER_REGION);
    let mut notices = Notices {
        apps_unavailable: !reload_apps(&mut drawer),
        ..Notices::default()
    };
    status_bar.set_notification(notices.message(GREETING));

    surface.framebuffer_mut().fill(Colour::White);
    render_all(&status_bar, &drawer, &mut surface).await;

    loop {
        let command = DISPLAY_CHANNEL.receiver().receive().await;
        info!("Display command: {}", command);

        match command {
            DisplayCommand::SelectPrevious => drawer.select_previous(&mut surface).await,
            DisplayCommand::SelectNext => drawer.select_next(&mut surface).await,
            DisplayCommand::ReloadApps => {
                notices.apps_unavailable = !reload_apps(&mut drawer);
                status_bar.set_notification(notices.message(GREETING));
                render_all(&status_bar, &drawer, &mut surface).await;
            }
            DisplayCommand::Publish(state) => {
                notices.offline = !state.network_connected;
                status_bar.set_notification(notices.message(GREETING));
                publish(&state, &mut status_bar, &mut surface).await;
            }
        }

        info!("Display update complete");
    }
}

/// Load the registry into the drawer; on failure the drawer is left empty.
/// Returns whether the registry loaded.
fn reload_apps(drawer: &mut AppDrawer) -> bool {
    match JsonRegistry::new(APP_REGISTRY_JSON).load_apps() {
        Ok(apps) => {
            drawer.load(apps);
            true
        }
        Err(e) => {
            warn!("App list unavailable: {}", e);
            drawer.load(AppList::new());
            false
        }
    }
}

/// Compose both regions and push them with a single refresh
async fn render_all(status_bar: &StatusBar, drawer: &AppDrawer, surface: &mut Surface) {
    status_bar.compose(surface);
    drawer.compose(surface);
    surface.render().await;
}

/// Firmware name and version centred on the panel
fn draw_splash<B>(fb: &mut Framebuffer<B>)
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let center = fb.bounding_box().center();

    let _ = Text::with_alignment("E-Paper", center - Point::new(0, 12), style, Alignment::Center)
        .draw(fb);
    let _ = Text::with_alignment("Launcher", center, style, Alignment::Center).draw(fb);
    let _ = Text::with_alignment(
        crate::FIRMWARE_VERSION,
        center + Point::new(0, 16),
        style,
        Alignment::Center,
    )
    .draw(fb);
}
