use serde::{Deserialize, Serialize};

use crate::types::TimeLeft;

/// Static CPU description, as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<String>,
}

impl CpuInfo {
    pub fn is_empty(&self) -> bool {
        self.model_name.is_none()
            && self.cores.is_none()
            && self.clock_speed.is_none()
            && self.cache_size.is_none()
    }
}

/// Primary display adapter description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_speed: Option<String>,
}

impl GpuInfo {
    pub fn is_empty(&self) -> bool {
        self.model_name.is_none() && self.memory_size.is_none() && self.clock_speed.is_none()
    }
}

/// Battery charge, estimated runtime, and AC state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryStatus {
    pub percent: f64,
    pub time_left: TimeLeft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_plugged: Option<bool>,
}

/// Battery state as reported by the management interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerStatus {
    pub battery_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_remaining: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_plugged: Option<bool>,
}

/// Local timezone identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimezoneInfo {
    pub timezone: String,
    pub timezone_name: String,
    pub dst: bool,
}

/// Active keyboard layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardLayout {
    pub layout_name: String,
    pub layout_id: String,
}

/// Current mode of the primary display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenResolution {
    pub resolution: String,
}

/// Operating system identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    pub system: String,
    pub release: String,
    pub version: String,
    pub architecture: String,
    pub processor: String,
}

/// Hostname, resolved address, and hardware address of this machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub hostname: String,
    pub ip_address: String,
    pub mac_address: String,
}

/// Virtual memory usage in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

/// Usage of the filesystem holding a path, in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

/// One running process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// System-wide CPU utilization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuLoad {
    pub usage: f64,
}

/// When the system was booted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootTime {
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    /// Local time, `%Y-%m-%d %H:%M:%S`.
    pub formatted: String,
}
