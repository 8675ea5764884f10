//! App registry: the list of launchable apps shown in the drawer.
//!
//! The registry is a JSON array of `{"name": ..., "id": ...}` objects, e.g.
//!
//! ```json
//! [{"name": "Weather", "id": "weather"}, {"name": "Notes", "id": "notes"}]
//! ```

use heapless::{String, Vec};
use serde::Deserialize;

use crate::error::Error;

/// Most apps a registry may hold.
pub const MAX_APPS: usize = 16;
pub const MAX_NAME_LEN: usize = 24;
pub const MAX_ID_LEN: usize = 32;

/// One launchable app. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppDescriptor {
    pub name: String<MAX_NAME_LEN>,
    #[serde(rename = "id")]
    pub identifier: String<MAX_ID_LEN>,
}

impl AppDescriptor {
    pub fn new(name: &str, identifier: &str) -> Result<Self, Error> {
        let mut n = String::new();
        n.push_str(name).map_err(|_| Error::BufferOverflow)?;
        let mut id = String::new();
        id.push_str(identifier).map_err(|_| Error::BufferOverflow)?;
        Ok(Self {
            name: n,
            identifier: id,
        })
    }
}

/// Ordered app list, as stored in the registry.
pub type AppList = Vec<AppDescriptor, MAX_APPS>;

/// Source of the app list.
pub trait AppRegistry {
    /// Read the whole list. Missing or unparsable data is an
    /// [`Error::AppRegistryFailure`]; there is no silent empty fallback.
    fn load_apps(&mut self) -> Result<AppList, Error>;
}

/// Registry backed by JSON bytes (typically embedded in the firmware image).
pub struct JsonRegistry<'a> {
    source: &'a [u8],
}

impl<'a> JsonRegistry<'a> {
    pub const fn new(source: &'a [u8]) -> Self {
        Self { source }
    }
}

impl AppRegistry for JsonRegistry<'_> {
    fn load_apps(&mut self) -> Result<AppList, Error> {
        if self.source.iter().all(u8::is_ascii_whitespace) {
            warn!("app registry is empty");
            return Err(Error::AppRegistryFailure);
        }
        match serde_json_core::from_slice::<AppList>(self.source) {
            Ok((apps, _)) => {
                info!("loaded {} apps", apps.len());
                Ok(apps)
            }
            Err(_) => {
                warn!("app registry could not be parsed");
                Err(Error::AppRegistryFailure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_apps_in_order() {
        let json = br#"[{"name": "Weather", "id": "weather"}, {"name": "Notes", "id": "notes"}]"#;
        let apps = JsonRegistry::new(json).load_apps().unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0], AppDescriptor::new("Weather", "weather").unwrap());
        assert_eq!(apps[1].name.as_str(), "Notes");
        assert_eq!(apps[1].identifier.as_str(), "notes");
    }

    #[test]
    fn empty_array_is_an_empty_list() {
        let apps = JsonRegistry::new(b"[]").load_apps().unwrap();
        assert!(apps.is_empty());
    }

    #[test]
    fn missing_registry_is_an_error() {
        assert_eq!(JsonRegistry::new(b"").load_apps(), Err(Error::AppRegistryFailure));
        assert_eq!(JsonRegistry::new(b"  \n").load_apps(), Err(Error::AppRegistryFailure));
    }

    #[test]
    fn malformed_registry_is_an_error() {
        assert_eq!(
            JsonRegistry::new(br#"[{"name": "Weather"}]"#).load_apps(),
            Err(Error::AppRegistryFailure)
        );
        assert_eq!(
            JsonRegistry::new(br#"{"Weather": "weather"#).load_apps(),
            Err(Error::AppRegistryFailure)
        );
    }

    #[test]
    fn oversized_entries_are_rejected() {
        let json = br#"[{"name": "An application name that is far too long", "id": "x"}]"#;
        assert_eq!(JsonRegistry::new(json).load_apps(), Err(Error::AppRegistryFailure));
    }

    #[test]
    fn descriptor_new_checks_capacity() {
        assert!(AppDescriptor::new("ok", "ok").is_ok());
        assert_eq!(
            AppDescriptor::new(&"n".repeat(MAX_NAME_LEN + 1), "id"),
            Err(Error::BufferOverflow)
        );
    }
}
