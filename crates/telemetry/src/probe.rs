//! The façade: one query per facet, dispatched per OS family.

use std::path::Path;

use hostscope_protocol::{
    BatteryStatus, BootTime, CpuInfo, CpuLoad, DiskUsage, Facet, GpuInfo, KeyboardLayout,
    MemoryInfo, NetworkInfo, OsFamily, OsInfo, PowerStatus, ProcessInfo, ScreenResolution,
    TimezoneInfo,
};

use crate::access::{Access, ProbeOptions};
use crate::error::{Reading, Unavailable};
use crate::linux::LinuxProbe;
use crate::unsupported::UnsupportedProbe;
use crate::windows::WindowsProbe;

/// Point-in-time telemetry for one OS family.
///
/// Every operation is independent, blocking and idempotent. Nothing is
/// cached between calls; a failure in one facet never affects another.
pub trait Probe: Send + Sync {
    fn family(&self) -> OsFamily;

    /// CPU temperature in °C.
    fn cpu_temperature(&self) -> Reading<f64>;

    /// GPU temperature in °C.
    fn gpu_temperature(&self) -> Reading<f64>;

    fn cpu_load(&self) -> Reading<CpuLoad>;

    /// Current CPU frequency in MHz.
    fn cpu_frequency(&self) -> Reading<f64>;

    /// Physical core count.
    fn cpu_cores(&self) -> Reading<usize>;

    /// Logical CPU (hardware thread) count.
    fn cpu_threads(&self) -> Reading<usize>;

    /// Memory speed in MHz.
    fn ram_speed(&self) -> Reading<f64>;

    fn cpu_info(&self) -> Reading<CpuInfo>;

    fn gpu_info(&self) -> Reading<GpuInfo>;

    fn battery_status(&self) -> Reading<BatteryStatus>;

    fn power_status(&self) -> Reading<PowerStatus>;

    /// Full-charge capacity (mAh on Linux, charge percent on Windows).
    fn battery_capacity(&self) -> Reading<f64>;

    fn timezone(&self) -> Reading<TimezoneInfo>;

    fn keyboard_layout(&self) -> Reading<KeyboardLayout>;

    fn screen_resolution(&self) -> Reading<ScreenResolution>;

    fn os_info(&self) -> Reading<OsInfo>;

    fn network_info(&self) -> Reading<NetworkInfo>;

    fn memory_info(&self) -> Reading<MemoryInfo>;

    /// Usage of the filesystem that holds `path`.
    fn disk_usage(&self, path: &Path) -> Reading<DiskUsage>;

    /// Every running process, unordered.
    fn process_list(&self) -> Reading<Vec<ProcessInfo>>;

    fn boot_time(&self) -> Reading<BootTime>;

    /// Active language/region tag, e.g. `en_US`.
    fn language(&self) -> Reading<String>;
}

/// Builds the probe for the running OS with native accessors.
pub fn detect(options: &ProbeOptions) -> Box<dyn Probe> {
    let family = OsFamily::current();
    tracing::debug!(%family, os = std::env::consts::OS, "selected probe");
    probe_for(family, Access::native(options))
}

/// Builds the probe for `family` on top of the given accessors.
pub fn probe_for(family: OsFamily, access: Access) -> Box<dyn Probe> {
    match family {
        OsFamily::Linux => Box::new(LinuxProbe::new(access)),
        OsFamily::Windows => Box::new(WindowsProbe::new(access)),
        OsFamily::Unsupported => Box::new(UnsupportedProbe::new(std::env::consts::OS)),
    }
}

/// Logs an unavailable facet; use with `Result::inspect_err`.
pub(crate) fn note(facet: Facet) -> impl Fn(&Unavailable) {
    move |e| {
        tracing::debug!(
            facet = %facet,
            kind = e.kind(),
            reason = e.reason(),
            "facet unavailable"
        );
    }
}
