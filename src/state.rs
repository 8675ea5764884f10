//! Global state management
//! Hands the scheduler's latest `SystemState` to the other tasks

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use epaper_launcher::SystemState;

/// Shared application state
pub struct AppState {
    /// Result of the last completed refresh; written only by the network task
    pub system: SystemState,
}

impl AppState {
    pub const fn new() -> Self {
        Self {
            system: SystemState {
                network_connected: false,
                last_synced_time: None,
            },
        }
    }
}

/// Global application state, protected by mutex
pub static APP_STATE: Mutex<CriticalSectionRawMutex, AppState> = Mutex::new(AppState::new());

/// Get a reference to the global application state
pub async fn get_state()
-> embassy_sync::mutex::MutexGuard<'static, CriticalSectionRawMutex, AppState> {
    APP_STATE.lock().await
}
