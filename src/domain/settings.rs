use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_true")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file_logging_enabled: default_true(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "antenna_positioner".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Name the positioner advertises in the bonded-device list.
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// Serial Port Profile service identifier on the peer.
    #[serde(default = "default_service_uuid")]
    pub service_uuid: String,
    #[serde(default = "default_rfcomm_channel")]
    pub rfcomm_channel: u8,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,

    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            service_uuid: default_service_uuid(),
            rfcomm_channel: default_rfcomm_channel(),
            connect_timeout_ms: default_connect_timeout_ms(),
            send_timeout_ms: default_send_timeout_ms(),
            log_settings: LogSettings::default(),
        }
    }
}

fn default_device_name() -> String {
    "ESP32MotorControl".to_string()
}
fn default_service_uuid() -> String {
    // Standard Serial Port Profile UUID.
    "00001101-0000-1000-8000-00805F9B34FB".to_string()
}
fn default_rfcomm_channel() -> u8 {
    1
}
fn default_connect_timeout_ms() -> u64 {
    10_000
}
fn default_send_timeout_ms() -> u64 {
    2_000
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_path()?;
        let settings = Self::load_from_file(&settings_path).unwrap_or_default();

        let service = Self {
            settings,
            settings_path,
        };
        // First run: persist the defaults so the operator has a file to edit.
        if !service.settings_path.exists() {
            service.save()?;
        }
        Ok(service)
    }

    fn get_settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("AntennaPositioner");
        fs::create_dir_all(&path)?;
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &PathBuf) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }
}
