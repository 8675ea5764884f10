//! Network and WiFi management task
//! Brings up the CYW43 and the network stack, then runs one refresh cycle
//! (reconnect + time sync) per update signal

use cyw43_pio::{DEFAULT_CLOCK_DIVIDER, PioSpi};
use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_net::{Config, StackResources};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{Delay, Duration, Instant, Timer};
use epaper_launcher::{UpdateScheduler, Uptime};
use static_cell::StaticCell;

use crate::config::{
    TIMEZONE, TIMEZONE_DB_API_KEY, TIMEZONE_DB_URL, WIFI_NETWORKS, WIFI_RETRY_POLICY,
};
use crate::event::{Event, send_event};
use crate::network::{CywLink, HttpTimeSource};
use crate::state::get_state;

/// Signal for triggering a refresh; requests made while one is running
/// collapse into a single follow-up cycle
static NETWORK_UPDATE_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Signals the network task to start a refresh
pub fn signal_network_update() {
    NETWORK_UPDATE_SIGNAL.signal(());
}

/// Time since boot from the embassy time driver
struct BootUptime;

impl Uptime for BootUptime {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// WiFi peripherals needed for initialization
pub struct WifiPeripherals {
    pub pwr_pin: embassy_rp::Peri<'static, PIN_23>,
    pub cs_pin: embassy_rp::Peri<'static, PIN_25>,
    pub pio: embassy_rp::Peri<'static, PIO0>,
    pub dio_pin: embassy_rp::Peri<'static, PIN_24>,
    pub clk_pin: embassy_rp::Peri<'static, PIN_29>,
    pub dma_ch: embassy_rp::Peri<'static, DMA_CH0>,
}

/// CYW43 runner task
#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

/// Network stack runner task
#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Network manager task - owns the update scheduler and publishes its state
#[embassy_executor::task]
pub async fn network_manager(spawner: Spawner, peripherals: WifiPeripherals) -> ! {
    info!("Network manager task started");
    Timer::after(Duration::from_secs(1)).await;

    // Load CYW43 firmware
    info!("Loading CYW43 firmware...");
    let fw = include_bytes!("../../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../../cyw43-firmware/43439A0_clm.bin");

    // Setup PIO for CYW43 SPI
    info!("Setting up PIO for CYW43 SPI...");
    let pwr = Output::new(peripherals.pwr_pin, Level::Low);
    let cs = Output::new(peripherals.cs_pin, Level::High);

    // Bind interrupts for PIO
    embassy_rp::bind_interrupts!(struct Irqs {
        PIO0_IRQ_0 => InterruptHandler<PIO0>;
    });

    let mut pio = Pio::new(peripherals.pio, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        peripherals.dio_pin,
        peripherals.clk_pin,
        peripherals.dma_ch,
    );

    info!("Initializing CYW43 driver...");
    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;

    info!("Spawning CYW43 runner task...");
    #[allow(clippy::unwrap_used)]
    spawner.spawn(cyw43_task(runner)).unwrap();

    info!("Initializing CYW43 with CLM data...");
    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;
    info!("WiFi chip initialized successfully");

    // Init network stack
    info!("Initializing network stack...");
    static RESOURCES: StaticCell<StackResources<5>> = StaticCell::new();

    // Generate pseudo-random seed from current time
    let seed = Instant::now().as_micros();
    info!("Network stack seed: {}", seed);

    let (stack, runner) = embassy_net::new(
        net_device,
        Config::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    info!("Spawning network stack runner task...");
    #[allow(clippy::unwrap_used)]
    spawner.spawn(net_task(runner)).unwrap();

    if WIFI_NETWORKS.is_empty() {
        warn!("No WiFi networks configured");
    }

    let link = CywLink::new(control, stack);
    let clock = HttpTimeSource::new(stack, TIMEZONE_DB_URL, TIMEZONE_DB_API_KEY);
    let mut scheduler =
        UpdateScheduler::new(link, clock, Delay, BootUptime, WIFI_NETWORKS, TIMEZONE)
            .with_policy(WIFI_RETRY_POLICY);

    info!("Network manager ready, waiting for signals...");
    loop {
        NETWORK_UPDATE_SIGNAL.wait().await;
        info!("Network update signal received, refreshing...");

        let was_connected = get_state().await.system.network_connected;
        let system = scheduler.refresh().await;

        get_state().await.system = system;

        if system.network_connected != was_connected {
            send_event(if system.network_connected {
                Event::NetworkConnected
            } else {
                Event::NetworkDisconnected
            })
            .await;
        }
        send_event(Event::SystemRefreshed).await;
    }
}
