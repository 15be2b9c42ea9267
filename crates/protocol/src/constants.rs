use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One independently queryable telemetry dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    CpuTemperature,
    GpuTemperature,
    CpuLoad,
    CpuFrequency,
    CpuCores,
    CpuThreads,
    RamSpeed,
    CpuInfo,
    GpuInfo,
    BatteryStatus,
    PowerStatus,
    BatteryCapacity,
    Timezone,
    KeyboardLayout,
    ScreenResolution,
    OsInfo,
    NetworkInfo,
    MemoryInfo,
    DiskUsage,
    ProcessList,
    BootTime,
    Language,
}

impl Facet {
    /// Every facet, in report order.
    pub const ALL: [Facet; 22] = [
        Facet::CpuTemperature,
        Facet::GpuTemperature,
        Facet::CpuLoad,
        Facet::CpuFrequency,
        Facet::CpuCores,
        Facet::CpuThreads,
        Facet::RamSpeed,
        Facet::CpuInfo,
        Facet::GpuInfo,
        Facet::BatteryStatus,
        Facet::PowerStatus,
        Facet::BatteryCapacity,
        Facet::Timezone,
        Facet::KeyboardLayout,
        Facet::ScreenResolution,
        Facet::OsInfo,
        Facet::NetworkInfo,
        Facet::MemoryInfo,
        Facet::DiskUsage,
        Facet::ProcessList,
        Facet::BootTime,
        Facet::Language,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::CpuTemperature => "cpu_temperature",
            Facet::GpuTemperature => "gpu_temperature",
            Facet::CpuLoad => "cpu_load",
            Facet::CpuFrequency => "cpu_frequency",
            Facet::CpuCores => "cpu_cores",
            Facet::CpuThreads => "cpu_threads",
            Facet::RamSpeed => "ram_speed",
            Facet::CpuInfo => "cpu_info",
            Facet::GpuInfo => "gpu_info",
            Facet::BatteryStatus => "battery_status",
            Facet::PowerStatus => "power_status",
            Facet::BatteryCapacity => "battery_capacity",
            Facet::Timezone => "timezone",
            Facet::KeyboardLayout => "keyboard_layout",
            Facet::ScreenResolution => "screen_resolution",
            Facet::OsInfo => "os_info",
            Facet::NetworkInfo => "network_info",
            Facet::MemoryInfo => "memory_info",
            Facet::DiskUsage => "disk_usage",
            Facet::ProcessList => "process_list",
            Facet::BootTime => "boot_time",
            Facet::Language => "language",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a facet name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown facet: {0}")]
pub struct UnknownFacet(pub String);

impl FromStr for Facet {
    type Err = UnknownFacet;

    /// Accepts the snake_case name; dashes are treated as underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Facet::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| UnknownFacet(s.to_string()))
    }
}
