//! Driver for the 2.9 inch e-Paper display (128x296, black/white)
//! Bit-banged SPI over GPIO, IL3820 command set.

use defmt::{debug, warn};
use embassy_time::{Duration, Instant, Timer};
use epaper_launcher::panel::Window;
use epaper_launcher::{Colour, PanelDriver};

use crate::config::EpdPins;

/// Display dimensions
pub const EPD_2IN9_WIDTH: u16 = 128;
pub const EPD_2IN9_HEIGHT: u16 = 296;

/// Upper bound on any single busy wait; a full refresh takes about 2 s.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// Command set
const DRIVER_OUTPUT_CONTROL: u8 = 0x01;
const BOOSTER_SOFT_START_CONTROL: u8 = 0x0C;
const DATA_ENTRY_MODE_SETTING: u8 = 0x11;
const MASTER_ACTIVATION: u8 = 0x20;
const DISPLAY_UPDATE_CONTROL_2: u8 = 0x22;
const WRITE_RAM: u8 = 0x24;
const WRITE_VCOM_REGISTER: u8 = 0x2C;
const WRITE_LUT_REGISTER: u8 = 0x32;
const SET_DUMMY_LINE_PERIOD: u8 = 0x3A;
const SET_GATE_TIME: u8 = 0x3B;
const SET_RAM_X_ADDRESS_START_END_POSITION: u8 = 0x44;
const SET_RAM_Y_ADDRESS_START_END_POSITION: u8 = 0x45;
const SET_RAM_X_ADDRESS_COUNTER: u8 = 0x4E;
const SET_RAM_Y_ADDRESS_COUNTER: u8 = 0x4F;
const TERMINATE_FRAME_READ_WRITE: u8 = 0xFF;

/// Waveform for a full (flashing) update
const LUT_FULL_UPDATE: [u8; 30] = [
    0x02, 0x02, 0x01, 0x11, 0x12, 0x12, 0x22, 0x22, 0x66, 0x69, 0x69, 0x59, 0x58, 0x99, 0x99,
    0x88, 0x00, 0x00, 0x00, 0x00, 0xF8, 0xB4, 0x13, 0x51, 0x35, 0x51, 0x51, 0x19, 0x01, 0x00,
];

/// e-Paper driver structure
pub struct Epd2in9<'d> {
    pins: EpdPins<'d>,
}

impl<'d> Epd2in9<'d> {
    /// Create new driver instance
    pub fn new(pins: EpdPins<'d>) -> Self {
        Self { pins }
    }

    /// Hardware reset (EPD_RST low->high with delays)
    async fn reset(&mut self) {
        self.pins.rst.set_low();
        Timer::after(Duration::from_millis(200)).await;
        self.pins.rst.set_high();
        Timer::after(Duration::from_millis(200)).await;
    }

    /// Bit-banged SPI: write single byte, MSB first
    fn spi_write_byte(&mut self, mut value: u8) {
        for _ in 0..8 {
            self.pins.clk.set_low();
            if (value & 0x80) != 0 {
                self.pins.mosi.set_high();
            } else {
                self.pins.mosi.set_low();
            }
            self.pins.clk.set_high();
            value <<= 1;
        }
        self.pins.clk.set_low();
    }

    fn send_command(&mut self, reg: u8) {
        self.pins.dc.set_low();
        self.pins.cs.set_low();
        self.spi_write_byte(reg);
        self.pins.cs.set_high();
    }

    fn send_data(&mut self, data: u8) {
        self.pins.dc.set_high();
        self.pins.cs.set_low();
        self.spi_write_byte(data);
        self.pins.cs.set_high();
    }

    fn send_data_buffer(&mut self, data: &[u8]) {
        for &b in data {
            self.send_data(b);
        }
    }

    /// Wait until BUSY goes low (controller idle), giving up after [`BUSY_TIMEOUT`].
    async fn wait_until_idle(&mut self) {
        let start = Instant::now();
        while self.pins.busy.is_high() {
            if start.elapsed() > BUSY_TIMEOUT {
                warn!("EPD busy for more than {} ms, carrying on", BUSY_TIMEOUT.as_millis());
                return;
            }
            Timer::after(Duration::from_millis(10)).await;
        }
        debug!("EPD idle after {} ms", start.elapsed().as_millis());
    }

    fn set_lut(&mut self, lut: &[u8]) {
        self.send_command(WRITE_LUT_REGISTER);
        self.send_data_buffer(lut);
    }

    /// RAM window; x is in pixels and must be a multiple of 8.
    fn set_memory_area(&mut self, x_start: u16, y_start: u16, x_end: u16, y_end: u16) {
        self.send_command(SET_RAM_X_ADDRESS_START_END_POSITION);
        self.send_data((x_start >> 3) as u8);
        self.send_data((x_end >> 3) as u8);
        self.send_command(SET_RAM_Y_ADDRESS_START_END_POSITION);
        self.send_data(y_start as u8);
        self.send_data((y_start >> 8) as u8);
        self.send_data(y_end as u8);
        self.send_data((y_end >> 8) as u8);
    }

    async fn set_memory_pointer(&mut self, x: u16, y: u16) {
        self.send_command(SET_RAM_X_ADDRESS_COUNTER);
        self.send_data((x >> 3) as u8);
        self.send_command(SET_RAM_Y_ADDRESS_COUNTER);
        self.send_data(y as u8);
        self.send_data((y >> 8) as u8);
        self.wait_until_idle().await;
    }
}

impl PanelDriver for Epd2in9<'_> {
    fn width(&self) -> u16 {
        EPD_2IN9_WIDTH
    }

    fn height(&self) -> u16 {
        EPD_2IN9_HEIGHT
    }

    async fn init(&mut self) {
        self.reset().await;

        self.send_command(DRIVER_OUTPUT_CONTROL);
        self.send_data(((EPD_2IN9_HEIGHT - 1) & 0xFF) as u8);
        self.send_data(((EPD_2IN9_HEIGHT - 1) >> 8) as u8);
        self.send_data(0x00); // GD = 0, SM = 0, TB = 0

        self.send_command(BOOSTER_SOFT_START_CONTROL);
        self.send_data(0xD7);
        self.send_data(0xD6);
        self.send_data(0x9D);

        self.send_command(WRITE_VCOM_REGISTER);
        self.send_data(0xA8);

        self.send_command(SET_DUMMY_LINE_PERIOD);
        self.send_data(0x1A); // 4 dummy lines per gate

        self.send_command(SET_GATE_TIME);
        self.send_data(0x08); // 2 us per line

        self.send_command(DATA_ENTRY_MODE_SETTING);
        self.send_data(0x03); // X increment, Y increment

        self.set_lut(&LUT_FULL_UPDATE);
        self.wait_until_idle().await;
    }

    async fn clear(&mut self, colour: Colour) {
        self.set_memory_area(0, 0, EPD_2IN9_WIDTH - 1, EPD_2IN9_HEIGHT - 1);
        self.set_memory_pointer(0, 0).await;
        self.send_command(WRITE_RAM);
        let byte = colour.fill_byte();
        for _ in 0..(EPD_2IN9_WIDTH / 8) as usize * EPD_2IN9_HEIGHT as usize {
            self.send_data(byte);
        }
        self.display_frame().await;
    }

    async fn set_frame_memory(&mut self, buffer: &[u8], x: u16, y: u16, width: u16, height: u16) {
        let Some(window) =
            Window::clipped(x, y, width, height, EPD_2IN9_WIDTH, EPD_2IN9_HEIGHT)
        else {
            warn!("EPD frame window {}x{} at ({}, {}) is empty", width, height, x, y);
            return;
        };

        self.set_memory_area(window.x, window.y, window.x_end, window.y_end);
        self.set_memory_pointer(window.x, window.y).await;
        self.send_command(WRITE_RAM);

        let expected = window.stride * window.rows;
        if buffer.len() < expected {
            warn!("EPD frame short: got {} bytes, expected {}", buffer.len(), expected);
        }
        for row in buffer.chunks(window.stride).take(window.rows) {
            self.send_data_buffer(&row[..window.row_bytes.min(row.len())]);
        }
    }

    async fn display_frame(&mut self) {
        self.send_command(DISPLAY_UPDATE_CONTROL_2);
        self.send_data(0xC4);
        self.send_command(MASTER_ACTIVATION);
        self.send_command(TERMINATE_FRAME_READ_WRITE);
        self.wait_until_idle().await;
    }
}
