//! # E-Paper Launcher
//! Raspberry Pi Pico W app launcher with clock on a 2.9" e-Paper display

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod config;
mod epd_2in9;
mod event;
mod network;
mod state;
mod task;

use config::FRAME_BUFFER_SIZE;
use task::{
    WifiPeripherals, button_handler, display_handler, network_manager, orchestrator, scheduler,
};

/// Firmware version - automatically populated from Cargo.toml
pub static FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to spawn tasks and unwrap, panicking if spawn fails.
/// This is acceptable during initialization as we want to fail fast if we can't spawn a task.
#[allow(clippy::unwrap_used)]
fn spawn_unwrap<S>(spawner: &Spawner, token: embassy_executor::SpawnToken<S>) {
    spawner.spawn(token).unwrap();
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Starting e-Paper Launcher v{}", FIRMWARE_VERSION);

    let p = embassy_rp::init(Default::default());

    // Initialize GPIO pins for e-paper display and buttons
    let (epd_pins, keys) = config::init_all(
        p.PIN_12, p.PIN_8, p.PIN_9, p.PIN_13, p.PIN_10, p.PIN_11, p.PIN_15, p.PIN_17, p.PIN_2,
    );

    spawn_unwrap(&spawner, button_handler(keys));

    // Frame buffer lives for the whole program and belongs to the display task
    static FRAME_BUFFER: StaticCell<[u8; FRAME_BUFFER_SIZE]> = StaticCell::new();
    let frame_buffer = FRAME_BUFFER.init([0xFF; FRAME_BUFFER_SIZE]);

    spawn_unwrap(&spawner, display_handler(epd_pins, frame_buffer));

    // Setup WiFi peripherals
    let wifi_peripherals = WifiPeripherals {
        pwr_pin: p.PIN_23,
        cs_pin: p.PIN_25,
        pio: p.PIO0,
        dio_pin: p.PIN_24,
        clk_pin: p.PIN_29,
        dma_ch: p.DMA_CH0,
    };

    spawn_unwrap(&spawner, network_manager(spawner, wifi_peripherals));

    spawn_unwrap(&spawner, orchestrator());
    spawn_unwrap(&spawner, scheduler());

    info!("All tasks spawned successfully");
}
