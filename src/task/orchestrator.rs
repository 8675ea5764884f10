//! Orchestrator task
//! Coordinates events and manages the main application flow

use defmt::info;
use embassy_time::{Duration, Timer};

use crate::config::UPDATE_INTERVAL_SECS;
use crate::event::{Event, receive_event, send_event};
use crate::state::get_state;
use crate::task::display::{DisplayCommand, send_display_command};
use crate::task::network::signal_network_update;

/// Main orchestrator task - coordinates application flow based on events
#[embassy_executor::task]
pub async fn orchestrator() -> ! {
    info!("Orchestrator task started");

    // Trigger initial refresh to start the first cycle
    signal_network_update();

    loop {
        let event = receive_event().await;

        match event {
            Event::Key0Pressed => {
                info!("KEY0 pressed - previous app");
                send_display_command(DisplayCommand::SelectPrevious).await;
            }
            Event::Key1Pressed => {
                info!("KEY1 pressed - next app");
                send_display_command(DisplayCommand::SelectNext).await;
            }
            Event::Key2Pressed => {
                info!("KEY2 pressed - reloading app list");
                send_display_command(DisplayCommand::ReloadApps).await;
            }
            Event::TimerExpired => {
                info!("Timer expired - triggering scheduled refresh");
                signal_network_update();
            }
            Event::NetworkConnected => {
                info!("Network connected");
            }
            Event::NetworkDisconnected => {
                info!("Network disconnected");
            }
            Event::SystemRefreshed => {
                let system = get_state().await.system;
                info!("Refresh complete: {}", system);
                send_display_command(DisplayCommand::Publish(system)).await;
            }
        }
    }
}

/// Scheduler task - requests a refresh every `UPDATE_INTERVAL_SECS`
#[embassy_executor::task]
pub async fn scheduler() -> ! {
    info!("Scheduler task started");

    loop {
        info!(
            "Scheduler: waiting {} seconds until next update",
            UPDATE_INTERVAL_SECS
        );
        Timer::after(Duration::from_secs(UPDATE_INTERVAL_SECS)).await;

        info!("Scheduler: timer expired, sending event");
        send_event(Event::TimerExpired).await;
    }
}
