//! Event system for inter-task communication

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Maximum number of events that can be queued
const EVENT_QUEUE_SIZE: usize = 10;

/// Events that can be sent between tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Event {
    /// Button 0 (KEY0) pressed - select previous app
    Key0Pressed,
    /// Button 1 (KEY1) pressed - select next app
    Key1Pressed,
    /// Button 2 (KEY2) pressed - reload the app list
    Key2Pressed,
    /// Timer expired - triggers a network/time refresh
    TimerExpired,
    /// Wi-Fi came up during a refresh
    NetworkConnected,
    /// Wi-Fi could not be (re)established during a refresh
    NetworkDisconnected,
    /// A refresh finished; the new state is in `APP_STATE`
    SystemRefreshed,
}

/// Global event channel for inter-task communication
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_SIZE> =
    Channel::new();

/// Send an event to the event channel (async)
pub async fn send_event(event: Event) {
    EVENT_CHANNEL.sender().send(event).await;
}

/// Receive an event from the event channel (blocking)
pub async fn receive_event() -> Event {
    EVENT_CHANNEL.receiver().receive().await
}
