//! Button handling task
//! Debounces the three keys and turns presses into events

use defmt::info;
use embassy_futures::select::{Either3, select3};
use embassy_time::{Duration, Timer};

use crate::config::Keys;
use crate::event::{Event, send_event};

/// Debounce settle time after an edge
const DEBOUNCE: Duration = Duration::from_millis(50);

/// Button identifiers
#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Button {
    /// Previous app
    Key0,
    /// Next app
    Key1,
    /// Reload app list
    Key2,
}

impl From<Button> for Event {
    fn from(button: Button) -> Self {
        match button {
            Button::Key0 => Event::Key0Pressed,
            Button::Key1 => Event::Key1Pressed,
            Button::Key2 => Event::Key2Pressed,
        }
    }
}

/// Button handler task - monitors all buttons and sends events
#[embassy_executor::task]
pub async fn button_handler(mut keys: Keys<'static>) -> ! {
    info!("Button handler task started");

    loop {
        let button = wait_for_button_press(&mut keys).await;
        info!("Button {:?} pressed, sending event", button);
        send_event(button.into()).await;
    }
}

/// Wait for a debounced press, then for its release.
/// Buttons are active-low with pull-up resistors.
async fn wait_for_button_press(keys: &mut Keys<'_>) -> Button {
    loop {
        let edge = select3(
            keys.key0.wait_for_falling_edge(),
            keys.key1.wait_for_falling_edge(),
            keys.key2.wait_for_falling_edge(),
        )
        .await;

        let (button, key) = match edge {
            Either3::First(_) => (Button::Key0, &mut keys.key0),
            Either3::Second(_) => (Button::Key1, &mut keys.key1),
            Either3::Third(_) => (Button::Key2, &mut keys.key2),
        };

        Timer::after(DEBOUNCE).await;
        if key.is_low() {
            key.wait_for_rising_edge().await;
            return button;
        }
        // Bounce, not a press
    }
}
