use std::path::Path;

use hostscope_protocol::{
    BatteryStatus, BootTime, CpuInfo, CpuLoad, DiskUsage, Facet, GpuInfo, KeyboardLayout,
    MemoryInfo, NetworkInfo, OsFamily, OsInfo, PowerStatus, ProcessInfo, ScreenResolution,
    TimezoneInfo,
};

use crate::error::{Reading, Unavailable};
use crate::probe::{Probe, note};

/// Probe for operating systems outside the recognized families.
///
/// Every facet is `NotApplicable`; nothing on the host is touched.
pub struct UnsupportedProbe {
    os: String,
}

impl UnsupportedProbe {
    pub fn new(os: &str) -> Self {
        Self { os: os.to_string() }
    }

    fn unsupported<T>(&self, facet: Facet) -> Reading<T> {
        Err(Unavailable::not_applicable(format!(
            "{facet} is not supported on {}",
            self.os
        )))
        .inspect_err(note(facet))
    }
}

impl Probe for UnsupportedProbe {
    fn family(&self) -> OsFamily {
        OsFamily::Unsupported
    }

    fn cpu_temperature(&self) -> Reading<f64> {
        self.unsupported(Facet::CpuTemperature)
    }

    fn gpu_temperature(&self) -> Reading<f64> {
        self.unsupported(Facet::GpuTemperature)
    }

    fn cpu_load(&self) -> Reading<CpuLoad> {
        self.unsupported(Facet::CpuLoad)
    }

    fn cpu_frequency(&self) -> Reading<f64> {
        self.unsupported(Facet::CpuFrequency)
    }

    fn cpu_cores(&self) -> Reading<usize> {
        self.unsupported(Facet::CpuCores)
    }

    fn cpu_threads(&self) -> Reading<usize> {
        self.unsupported(Facet::CpuThreads)
    }

    fn ram_speed(&self) -> Reading<f64> {
        self.unsupported(Facet::RamSpeed)
    }

    fn cpu_info(&self) -> Reading<CpuInfo> {
        self.unsupported(Facet::CpuInfo)
    }

    fn gpu_info(&self) -> Reading<GpuInfo> {
        self.unsupported(Facet::GpuInfo)
    }

    fn battery_status(&self) -> Reading<BatteryStatus> {
        self.unsupported(Facet::BatteryStatus)
    }

    fn power_status(&self) -> Reading<PowerStatus> {
        self.unsupported(Facet::PowerStatus)
    }

    fn battery_capacity(&self) -> Reading<f64> {
        self.unsupported(Facet::BatteryCapacity)
    }

    fn timezone(&self) -> Reading<TimezoneInfo> {
        self.unsupported(Facet::Timezone)
    }

    fn keyboard_layout(&self) -> Reading<KeyboardLayout> {
        self.unsupported(Facet::KeyboardLayout)
    }

    fn screen_resolution(&self) -> Reading<ScreenResolution> {
        self.unsupported(Facet::ScreenResolution)
    }

    fn os_info(&self) -> Reading<OsInfo> {
        self.unsupported(Facet::OsInfo)
    }

    fn network_info(&self) -> Reading<NetworkInfo> {
        self.unsupported(Facet::NetworkInfo)
    }

    fn memory_info(&self) -> Reading<MemoryInfo> {
        self.unsupported(Facet::MemoryInfo)
    }

    fn disk_usage(&self, _path: &Path) -> Reading<DiskUsage> {
        self.unsupported(Facet::DiskUsage)
    }

    fn process_list(&self) -> Reading<Vec<ProcessInfo>> {
        self.unsupported(Facet::ProcessList)
    }

    fn boot_time(&self) -> Reading<BootTime> {
        self.unsupported(Facet::BootTime)
    }

    fn language(&self) -> Reading<String> {
        self.unsupported(Facet::Language)
    }
}
