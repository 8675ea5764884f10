//! # E-Paper Launcher core
//! Hardware-independent half of the launcher firmware: the monochrome
//! framebuffer, the full-frame display surface, the status bar and app
//! drawer regions, and the periodic network/time refresh.
//!
//! The firmware binary (`src/main.rs`) wires these to the Pico W peripherals.
//! Everything here also builds for the host so it can be tested with
//! `cargo test`.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod drawer;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod notice;
pub mod panel;
pub mod region;
pub mod registry;
pub mod scheduler;
pub mod statusbar;
pub mod surface;
pub mod time;
pub mod timezone;

pub use drawer::AppDrawer;
pub use error::{Error, TimeFetchError};
pub use framebuffer::{Colour, Framebuffer};
pub use notice::Notices;
pub use panel::PanelDriver;
pub use region::Region;
pub use registry::{AppDescriptor, AppList, AppRegistry, JsonRegistry};
pub use scheduler::{
    Credential, RetryPolicy, SystemState, TimeSource, UpdateScheduler, Uptime, WifiLink,
};
pub use statusbar::StatusBar;
pub use surface::DisplaySurface;
pub use time::DateTime;
