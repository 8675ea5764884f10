//! GPIO configuration for the 2.9" e-Paper display and the keys, plus
//! the build-time settings generated from `config.toml`.
//! Bit-banged SPI pins (CLK/MOSI) are provided via GPIOs.

#![allow(dead_code)]

include!(concat!(env!("OUT_DIR"), "/config_generated.rs"));

use embassy_rp::{
    Peri,
    gpio::{Input, Level, Output, Pull},
    peripherals,
};
use epaper_launcher::Region;
use epaper_launcher::framebuffer::buffer_len;

use crate::epd_2in9::{EPD_2IN9_HEIGHT, EPD_2IN9_WIDTH};

/// Frame buffer bytes for the whole panel (1 bit per pixel).
pub const FRAME_BUFFER_SIZE: usize = buffer_len(EPD_2IN9_WIDTH, EPD_2IN9_HEIGHT);

/// Status bar across the top of the portrait panel.
pub const STATUS_BAR_REGION: Region = Region::new(0, 0, EPD_2IN9_WIDTH as i32, 36);

/// App drawer fills everything below the status bar.
pub const APP_DRAWER_REGION: Region = Region::new(
    0,
    STATUS_BAR_REGION.bottom(),
    EPD_2IN9_WIDTH as i32,
    EPD_2IN9_HEIGHT as i32 - STATUS_BAR_REGION.bottom(),
);

/// Upper bound on one timezone service request, connect to last body byte.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Upper bound on a single Wi-Fi join call.
pub const JOIN_TIMEOUT_SECS: u64 = 15;

/// Pins for e-Paper display (bit-banged SPI).
///
/// - CS   -> GPIO9
/// - DC   -> GPIO8
/// - RST  -> GPIO12
/// - BUSY -> GPIO13
/// - CLK  -> GPIO10
/// - MOSI -> GPIO11
pub struct EpdPins<'d> {
    pub rst: Output<'d>,
    pub dc: Output<'d>,
    pub cs: Output<'d>,
    pub busy: Input<'d>,
    pub clk: Output<'d>,
    pub mosi: Output<'d>,
}

/// Keys (buttons), active low:
/// - KEY0 -> GPIO15 (previous app)
/// - KEY1 -> GPIO17 (next app)
/// - KEY2 -> GPIO2  (reload app list)
pub struct Keys<'d> {
    pub key0: Input<'d>,
    pub key1: Input<'d>,
    pub key2: Input<'d>,
}

/// Initialize all components (consumes the pins).
/// Returns bit-banged SPI GPIOs for the e-Paper and the three keys.
#[allow(clippy::too_many_arguments)]
pub fn init_all(
    pin_12: Peri<'static, peripherals::PIN_12>,
    pin_8: Peri<'static, peripherals::PIN_8>,
    pin_9: Peri<'static, peripherals::PIN_9>,
    pin_13: Peri<'static, peripherals::PIN_13>,
    pin_10: Peri<'static, peripherals::PIN_10>,
    pin_11: Peri<'static, peripherals::PIN_11>,
    pin_15: Peri<'static, peripherals::PIN_15>,
    pin_17: Peri<'static, peripherals::PIN_17>,
    pin_2: Peri<'static, peripherals::PIN_2>,
) -> (EpdPins<'static>, Keys<'static>) {
    // e-Paper control pins
    let rst = Output::new(pin_12, Level::High);
    let dc = Output::new(pin_8, Level::High);
    let cs = Output::new(pin_9, Level::High);
    let busy = Input::new(pin_13, Pull::None);

    // Bit-banged SPI lines
    let clk = Output::new(pin_10, Level::Low);
    let mosi = Output::new(pin_11, Level::Low);

    let epd_pins = EpdPins {
        rst,
        dc,
        cs,
        busy,
        clk,
        mosi,
    };

    let key0 = Input::new(pin_15, Pull::Up);
    let key1 = Input::new(pin_17, Pull::Up);
    let key2 = Input::new(pin_2, Pull::Up);
    let keys = Keys { key0, key1, key2 };

    (epd_pins, keys)
}
