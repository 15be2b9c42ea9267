pub mod constants;
pub mod telemetry;
pub mod types;

// Re-export primary types for convenience.
pub use constants::Facet;
pub use telemetry::{
    BatteryStatus, BootTime, CpuInfo, CpuLoad, DiskUsage, GpuInfo, KeyboardLayout, MemoryInfo,
    NetworkInfo, OsInfo, PowerStatus, ProcessInfo, ScreenResolution, TimezoneInfo,
};
pub use types::{OsFamily, TimeLeft};
