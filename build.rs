//! Build script
//! - Generates `config_generated.rs` from `config.toml` + `EPAPER_*` env vars
//! - Embeds the app registry JSON
//! - Provides `memory.x` and link args when building the firmware

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const ENV_KEYS: &[&str] = &[
    "EPAPER_TIMEZONE",
    "EPAPER_TIMEZONE_DB_URL",
    "EPAPER_TIMEZONE_DB_API_KEY",
    "EPAPER_UPDATE_INTERVAL_SECS",
    "EPAPER_WIFI_RETRIES",
    "EPAPER_WIFI_RETRY_BACKOFF_MS",
    "EPAPER_GREETING",
    "EPAPER_APP_REGISTRY",
];

#[derive(Debug, Deserialize)]
struct WifiNetwork {
    ssid: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct Settings {
    #[serde(default)]
    wifi_networks: Vec<WifiNetwork>,
    timezone: String,
    timezone_db_url: String,
    timezone_db_api_key: String,
    update_interval_secs: u64,
    wifi_retries: u8,
    wifi_retry_backoff_ms: u32,
    greeting: String,
    app_registry: String,
}

fn load_settings() -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .set_default("timezone", "Etc/UTC")?
        .set_default("timezone_db_url", "http://api.timezonedb.com")?
        .set_default("timezone_db_api_key", "")?
        .set_default("update_interval_secs", 60)?
        .set_default("wifi_retries", 5)?
        .set_default("wifi_retry_backoff_ms", 2000)?
        .set_default("greeting", "Hi There")?
        .set_default("app_registry", "app_mapping.json")?
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("EPAPER").try_parsing(true))
        .build()?
        .try_deserialize()
}

fn generate(settings: &Settings, registry: &Path) -> String {
    let mut out = String::new();
    out.push_str("// Generated by build.rs. Do not edit.\n\n");

    out.push_str("pub const WIFI_NETWORKS: &[epaper_launcher::Credential<'static>] = &[\n");
    for network in &settings.wifi_networks {
        let _ = writeln!(
            out,
            "    epaper_launcher::Credential {{ ssid: {:?}, password: {:?} }},",
            network.ssid, network.password
        );
    }
    out.push_str("];\n");

    let _ = writeln!(out, "pub const TIMEZONE: &str = {:?};", settings.timezone);
    let _ = writeln!(out, "pub const TIMEZONE_DB_URL: &str = {:?};", settings.timezone_db_url);
    let _ = writeln!(
        out,
        "pub const TIMEZONE_DB_API_KEY: &str = {:?};",
        settings.timezone_db_api_key
    );
    let _ = writeln!(
        out,
        "pub const UPDATE_INTERVAL_SECS: u64 = {};",
        settings.update_interval_secs.max(1)
    );
    let _ = writeln!(
        out,
        "pub const WIFI_RETRY_POLICY: epaper_launcher::RetryPolicy = \
         epaper_launcher::RetryPolicy {{ attempts_per_network: {}, backoff_ms: {} }};",
        settings.wifi_retries.max(1),
        settings.wifi_retry_backoff_ms
    );
    let _ = writeln!(out, "pub const GREETING: &str = {:?};", settings.greeting);
    let _ = writeln!(
        out,
        "pub static APP_REGISTRY_JSON: &[u8] = include_bytes!({:?});",
        registry.display().to_string()
    );
    out
}

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=config.toml");
    for key in ENV_KEYS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    let settings = load_settings().unwrap_or_else(|e| panic!("invalid configuration: {e}"));
    if settings.wifi_networks.is_empty() {
        println!("cargo:warning=no wifi_networks configured; the clock will stay offline");
    }

    // Missing registry becomes an empty blob so the firmware reports it at runtime.
    println!("cargo:rerun-if-changed={}", settings.app_registry);
    let registry = out_dir.join("app_mapping.json");
    let bytes = fs::read(&settings.app_registry).unwrap_or_else(|_| {
        println!(
            "cargo:warning=app registry {} not found; embedding an empty one",
            settings.app_registry
        );
        Vec::new()
    });
    fs::write(&registry, bytes).expect("write app registry");

    fs::write(
        out_dir.join("config_generated.rs"),
        generate(&settings, &registry),
    )
    .expect("write config_generated.rs");

    // Linker setup only matters for the firmware image.
    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("thumb") {
        fs::copy("memory.x", out_dir.join("memory.x")).expect("copy memory.x");
        println!("cargo:rustc-link-search={}", out_dir.display());
        println!("cargo:rerun-if-changed=memory.x");
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}
