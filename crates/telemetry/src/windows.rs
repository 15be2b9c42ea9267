//! Windows probe: WMI classes, the registry and `GetSystemPowerStatus`.

use std::path::Path;

use hostscope_protocol::{
    BatteryStatus, BootTime, CpuInfo, CpuLoad, DiskUsage, Facet, GpuInfo, KeyboardLayout,
    MemoryInfo, NetworkInfo, OsFamily, OsInfo, PowerStatus, ProcessInfo, ScreenResolution,
    TimeLeft, TimezoneInfo,
};

use crate::access::{Access, Hive, SystemPowerStatus, WmiRow};
use crate::error::{Reading, Unavailable};
use crate::parse;
use crate::portable;
use crate::probe::{Probe, note};

const KEYBOARD_LAYOUT_KEY: &str = r"SYSTEM\CurrentControlSet\Control\Keyboard Layout";
const INTERNATIONAL_KEY: &str = r"Control Panel\International";
const WMI_NAMESPACE: &str = r"root\WMI";

/// `SYSTEM_POWER_STATUS.BatteryFlag` bit for "no system battery".
const NO_SYSTEM_BATTERY: u8 = 128;
const UNKNOWN_PERCENT: u8 = 255;
const UNKNOWN_LIFE_TIME: u32 = u32::MAX;

/// Probe for the Windows family.
pub struct WindowsProbe {
    access: Access,
}

/// Non-empty value of `field` in a WMI row.
fn field<'a>(row: &'a WmiRow, name: &str) -> Option<&'a str> {
    row.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

fn numeric<T: std::str::FromStr>(row: &WmiRow, name: &str) -> Reading<T> {
    let raw = field(row, name)
        .ok_or_else(|| Unavailable::parse(format!("{name} missing from WMI row")))?;
    raw.parse()
        .map_err(|_| Unavailable::parse(format!("{name}: not a number: {raw:?}")))
}

impl WindowsProbe {
    pub fn new(access: Access) -> Self {
        Self { access }
    }

    fn rows(&self, namespace: Option<&str>, class: &str, fields: &[&str]) -> Reading<Vec<WmiRow>> {
        let rows = self.access.wmi.query(namespace, class, fields)?;
        if rows.is_empty() {
            return Err(Unavailable::SourceUnavailable(format!("no {class} instances")));
        }
        Ok(rows)
    }

    fn first_row(&self, class: &str, fields: &[&str]) -> Reading<WmiRow> {
        self.rows(None, class, fields)
            .map(|rows| rows.into_iter().next().unwrap_or_default())
    }

    /// Power status with the "no battery" flag turned into `NotApplicable`.
    fn battery_power(&self) -> Reading<SystemPowerStatus> {
        let status = self.access.power.system_power_status()?;
        if status.battery_flag & NO_SYSTEM_BATTERY != 0 {
            return Err(Unavailable::not_applicable("no system battery"));
        }
        Ok(status)
    }

    fn battery_percent(status: &SystemPowerStatus) -> Reading<f64> {
        match status.battery_life_percent {
            UNKNOWN_PERCENT => Err(Unavailable::SourceUnavailable(
                "battery charge unknown".into(),
            )),
            pct => Ok(f64::from(pct.min(100))),
        }
    }
}

impl Probe for WindowsProbe {
    fn family(&self) -> OsFamily {
        OsFamily::Windows
    }

    /// `WMIC CPU GET Temperature` prints a header and the value in tenths of
    /// a degree.
    fn cpu_temperature(&self) -> Reading<f64> {
        self.access
            .commands
            .run("WMIC", &["CPU", "GET", "Temperature"])
            .and_then(|out| {
                let value = parse::second_line(&out)
                    .ok_or_else(|| Unavailable::parse("WMIC printed no temperature line"))?;
                parse::scaled(value, 10.0, "WMIC CPU Temperature")
            })
            .inspect_err(note(Facet::CpuTemperature))
    }

    fn gpu_temperature(&self) -> Reading<f64> {
        self.rows(
            Some(WMI_NAMESPACE),
            "MSAcpi_ThermalZoneTemperature",
            &["CurrentTemperature", "InstanceName"],
        )
        .and_then(|rows| {
            rows.iter()
                .filter(|row| {
                    field(row, "InstanceName")
                        .is_some_and(|name| name.to_ascii_lowercase().contains("gpu"))
                })
                .filter_map(|row| numeric::<f64>(row, "CurrentTemperature").ok())
                .find(|raw| *raw != -1.0)
                .map(|raw| parse::round2(parse::deci_kelvin_to_celsius(raw)))
                .ok_or_else(|| Unavailable::SourceUnavailable("no GPU thermal zone".into()))
        })
        .inspect_err(note(Facet::GpuTemperature))
    }

    /// Mean `LoadPercentage` across processor sockets.
    fn cpu_load(&self) -> Reading<CpuLoad> {
        self.rows(None, "Win32_Processor", &["LoadPercentage"])
            .and_then(|rows| {
                let loads = rows
                    .iter()
                    .map(|row| numeric::<f64>(row, "LoadPercentage"))
                    .collect::<Reading<Vec<_>>>()?;
                let mean = loads.iter().sum::<f64>() / loads.len() as f64;
                Ok(CpuLoad {
                    usage: parse::round2(mean.clamp(0.0, 100.0)),
                })
            })
            .inspect_err(note(Facet::CpuLoad))
    }

    fn cpu_frequency(&self) -> Reading<f64> {
        portable::cpu_frequency(&self.access).inspect_err(note(Facet::CpuFrequency))
    }

    fn cpu_cores(&self) -> Reading<usize> {
        portable::cpu_cores(&self.access).inspect_err(note(Facet::CpuCores))
    }

    fn cpu_threads(&self) -> Reading<usize> {
        portable::cpu_threads(&self.access).inspect_err(note(Facet::CpuThreads))
    }

    fn ram_speed(&self) -> Reading<f64> {
        self.first_row("Win32_PhysicalMemory", &["Speed"])
            .and_then(|row| numeric(&row, "Speed"))
            .inspect_err(note(Facet::RamSpeed))
    }

    fn cpu_info(&self) -> Reading<CpuInfo> {
        self.first_row(
            "Win32_Processor",
            &["Name", "NumberOfCores", "CurrentClockSpeed", "L2CacheSize"],
        )
        .and_then(|row| {
            let info = CpuInfo {
                model_name: field(&row, "Name").map(str::to_string),
                cores: field(&row, "NumberOfCores").map(str::to_string),
                clock_speed: field(&row, "CurrentClockSpeed").map(str::to_string),
                cache_size: field(&row, "L2CacheSize").map(|kb| format!("{kb} KB")),
            };
            if info.is_empty() {
                return Err(Unavailable::parse("Win32_Processor row has no known fields"));
            }
            Ok(info)
        })
        .inspect_err(note(Facet::CpuInfo))
    }

    fn gpu_info(&self) -> Reading<GpuInfo> {
        self.first_row("Win32_VideoController", &["Name", "AdapterRAM"])
            .and_then(|row| {
                let info = GpuInfo {
                    model_name: field(&row, "Name").map(str::to_string),
                    memory_size: field(&row, "AdapterRAM")
                        .and_then(|b| b.parse::<u64>().ok())
                        .map(|bytes| format!("{}M", bytes / (1024 * 1024))),
                    clock_speed: None,
                };
                if info.is_empty() {
                    return Err(Unavailable::parse(
                        "Win32_VideoController row has no known fields",
                    ));
                }
                Ok(info)
            })
            .inspect_err(note(Facet::GpuInfo))
    }

    fn battery_status(&self) -> Reading<BatteryStatus> {
        self.battery_power()
            .and_then(|status| {
                let percent = Self::battery_percent(&status)?;
                let power_plugged = match status.ac_line_status {
                    0 => Some(false),
                    1 => Some(true),
                    _ => None,
                };
                let time_left = match (power_plugged, status.battery_life_time) {
                    (Some(true), _) => TimeLeft::Unlimited,
                    (_, UNKNOWN_LIFE_TIME) => TimeLeft::Unknown,
                    (_, secs) => TimeLeft::Seconds(u64::from(secs)),
                };
                Ok(BatteryStatus {
                    percent,
                    time_left,
                    power_plugged,
                })
            })
            .inspect_err(note(Facet::BatteryStatus))
    }

    /// `BatteryStatus` codes 2 and 6..=9 mean the machine is on mains power.
    fn power_status(&self) -> Reading<PowerStatus> {
        self.first_row(
            "Win32_Battery",
            &["Status", "EstimatedChargeRemaining", "BatteryStatus"],
        )
        .map(|row| PowerStatus {
            battery_status: field(&row, "Status").unwrap_or("Unknown").to_string(),
            battery_remaining: numeric::<u8>(&row, "EstimatedChargeRemaining")
                .ok()
                .map(|pct| pct.min(100)),
            power_plugged: match numeric::<u16>(&row, "BatteryStatus") {
                Ok(2 | 3 | 6 | 7 | 8 | 9) => Some(true),
                Ok(1 | 4 | 5) => Some(false),
                _ => None,
            },
        })
        .inspect_err(note(Facet::PowerStatus))
    }

    /// Reported as the current charge percentage.
    fn battery_capacity(&self) -> Reading<f64> {
        self.battery_power()
            .and_then(|status| Self::battery_percent(&status))
            .inspect_err(note(Facet::BatteryCapacity))
    }

    fn timezone(&self) -> Reading<TimezoneInfo> {
        self.first_row(
            "Win32_TimeZone",
            &["Caption", "StandardName", "DaylightMonth"],
        )
        .and_then(|row| {
            let timezone = field(&row, "Caption")
                .ok_or_else(|| Unavailable::parse("Win32_TimeZone has no Caption"))?;
            Ok(TimezoneInfo {
                timezone: timezone.to_string(),
                timezone_name: field(&row, "StandardName").unwrap_or(timezone).to_string(),
                dst: field(&row, "DaylightMonth").is_some_and(|m| m != "0"),
            })
        })
        .inspect_err(note(Facet::Timezone))
    }

    fn keyboard_layout(&self) -> Reading<KeyboardLayout> {
        let registry = &self.access.registry;
        registry
            .read_string(Hive::LocalMachine, KEYBOARD_LAYOUT_KEY, "Layout Text")
            .and_then(|layout_name| {
                let layout_id =
                    registry.read_string(Hive::LocalMachine, KEYBOARD_LAYOUT_KEY, "Layout ID")?;
                Ok(KeyboardLayout {
                    layout_name,
                    layout_id,
                })
            })
            .inspect_err(note(Facet::KeyboardLayout))
    }

    fn screen_resolution(&self) -> Reading<ScreenResolution> {
        self.rows(
            None,
            "Win32_VideoController",
            &["CurrentHorizontalResolution", "CurrentVerticalResolution"],
        )
        .and_then(|rows| {
            rows.iter()
                .find_map(|row| {
                    let width = field(row, "CurrentHorizontalResolution")?;
                    let height = field(row, "CurrentVerticalResolution")?;
                    Some(format!("{width}x{height}"))
                })
                .map(|resolution| ScreenResolution { resolution })
                .ok_or_else(|| Unavailable::parse("no video controller reports a current mode"))
        })
        .inspect_err(note(Facet::ScreenResolution))
    }

    fn os_info(&self) -> Reading<OsInfo> {
        let facts = self.access.stats.os_facts();
        let release = facts
            .os_version
            .ok_or_else(|| Unavailable::SourceUnavailable("Windows release unknown".into()))
            .inspect_err(note(Facet::OsInfo))?;

        Ok(OsInfo {
            name: "nt".into(),
            system: "Windows".into(),
            release,
            version: facts.kernel_version.unwrap_or_default(),
            architecture: format!("{}bit", usize::BITS),
            processor: facts.cpu_brand.unwrap_or(facts.arch),
        })
    }

    fn network_info(&self) -> Reading<NetworkInfo> {
        let read = || -> Reading<NetworkInfo> {
            let hostname = self.access.host.hostname()?;
            let ip_address = portable::resolve_address(&self.access, &hostname)?;
            let getmac = self.access.commands.run("getmac", &["/fo", "csv", "/nh"])?;
            let mac_address = parse::format_mac(parse::getmac_csv(&getmac)?);
            Ok(NetworkInfo {
                hostname,
                ip_address,
                mac_address,
            })
        };
        read().inspect_err(note(Facet::NetworkInfo))
    }

    fn memory_info(&self) -> Reading<MemoryInfo> {
        portable::memory_info(&self.access).inspect_err(note(Facet::MemoryInfo))
    }

    fn disk_usage(&self, path: &Path) -> Reading<DiskUsage> {
        portable::disk_usage(&self.access, path).inspect_err(note(Facet::DiskUsage))
    }

    fn process_list(&self) -> Reading<Vec<ProcessInfo>> {
        portable::process_list(&self.access).inspect_err(note(Facet::ProcessList))
    }

    fn boot_time(&self) -> Reading<BootTime> {
        portable::boot_time(&self.access).inspect_err(note(Facet::BootTime))
    }

    fn language(&self) -> Reading<String> {
        self.access
            .registry
            .read_string(Hive::CurrentUser, INTERNATIONAL_KEY, "LocaleName")
            .and_then(|name| {
                let name = name.trim();
                if name.is_empty() {
                    return Err(Unavailable::parse("LocaleName is empty"));
                }
                Ok(name.replace('-', "_"))
            })
            .inspect_err(note(Facet::Language))
    }
}
