//! Linux probe: sysfs/procfs reads plus a handful of CLI tools.

use std::path::{Path, PathBuf};

use hostscope_protocol::{
    BatteryStatus, BootTime, CpuInfo, CpuLoad, DiskUsage, Facet, GpuInfo, KeyboardLayout,
    MemoryInfo, NetworkInfo, OsFamily, OsInfo, PowerStatus, ProcessInfo, ScreenResolution,
    TimeLeft, TimezoneInfo,
};

use crate::access::Access;
use crate::error::{Reading, Unavailable};
use crate::parse;
use crate::portable;
use crate::probe::{Probe, note};

const THERMAL_ZONE0: &str = "/sys/class/thermal/thermal_zone0/temp";
const CPUINFO: &str = "/proc/cpuinfo";
const KERNEL_VERSION: &str = "/proc/sys/kernel/version";
const POWER_SUPPLY: &str = "/sys/class/power_supply";
const BAT0_CHARGE_FULL: &str = "/sys/class/power_supply/BAT0/charge_full";
const NET_CLASS: &str = "/sys/class/net";
const CORETEMP_MODALIAS: &str = "/sys/bus/platform/drivers/coretemp/coretemp.0/hwmon/hwmon0/modalias";
const PLATFORM_DEVICES: &str = "/sys/devices/platform";

/// Probe for the Linux family.
pub struct LinuxProbe {
    access: Access,
}

impl LinuxProbe {
    pub fn new(access: Access) -> Self {
        Self { access }
    }

    fn read(&self, path: impl AsRef<Path>) -> Reading<String> {
        self.access.fs.read_to_string(path.as_ref())
    }

    fn read_trimmed(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read(path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn read_i64(&self, path: impl AsRef<Path>) -> Option<i64> {
        self.read_trimmed(path).and_then(|s| s.parse().ok())
    }

    /// First `BAT*` supply, falling back to one literally named `battery`.
    fn battery_dir(&self) -> Reading<PathBuf> {
        let entries = self.access.fs.list_dir(Path::new(POWER_SUPPLY))?;
        entries
            .iter()
            .find(|n| n.starts_with("BAT"))
            .or_else(|| entries.iter().find(|n| n.as_str() == "battery"))
            .map(|n| Path::new(POWER_SUPPLY).join(n))
            .ok_or_else(|| Unavailable::SourceUnavailable("no battery power supply".into()))
    }

    /// Whether any mains supply reports `online`.
    fn ac_online(&self) -> Option<bool> {
        let entries = self.access.fs.list_dir(Path::new(POWER_SUPPLY)).ok()?;
        let mut seen = false;
        for name in entries.iter().filter(|n| n.starts_with("AC") || n.starts_with("ADP")) {
            if let Some(online) = self.read_i64(Path::new(POWER_SUPPLY).join(name).join("online")) {
                if online == 1 {
                    return Some(true);
                }
                seen = true;
            }
        }
        seen.then_some(false)
    }

    fn ram_speed_from_dmi(&self) -> Reading<f64> {
        let modalias = self.read(CORETEMP_MODALIAS)?;
        let dmi_id = parse::modalias_dmi(&modalias)
            .ok_or_else(|| Unavailable::parse("coretemp modalias has no dmi: field"))?;

        let devices = self.access.fs.list_dir(Path::new(PLATFORM_DEVICES))?;
        let device = devices
            .iter()
            .find(|name| name.contains(dmi_id))
            .map(|name| Path::new(PLATFORM_DEVICES).join(name))
            .ok_or_else(|| {
                Unavailable::SourceUnavailable(format!("no platform device matches {dmi_id}"))
            })?;

        let product = self.read(device.join("dmi/id/product_name"))?.to_lowercase();
        if !product.contains("thinkpad") {
            return Err(Unavailable::not_applicable(
                "ram speed is only read on ThinkPad DMI layouts",
            ));
        }

        let bandwidth = self.read(device.join("memory_bandwidth"))?;
        parse::scaled(&bandwidth, 1000.0, "memory_bandwidth")
    }

    /// Hardware address of the first non-loopback interface.
    fn node_id(&self) -> Reading<u64> {
        let interfaces = self.access.fs.list_dir(Path::new(NET_CLASS))?;
        interfaces
            .iter()
            .filter(|name| name.as_str() != "lo")
            .filter_map(|name| self.read(Path::new(NET_CLASS).join(name).join("address")).ok())
            .filter_map(|addr| parse::parse_mac(&addr))
            .find(|node| *node != 0)
            .ok_or_else(|| {
                Unavailable::SourceUnavailable("no interface with a hardware address".into())
            })
    }
}

impl Probe for LinuxProbe {
    fn family(&self) -> OsFamily {
        OsFamily::Linux
    }

    fn cpu_temperature(&self) -> Reading<f64> {
        self.read(THERMAL_ZONE0)
            .and_then(|raw| parse::scaled(&raw, 1000.0, "thermal_zone0"))
            .inspect_err(note(Facet::CpuTemperature))
    }

    /// Assumes an NVIDIA GPU. A missing `nvidia-smi` is reported as
    /// `SourceUnavailable`, which is distinct from a GPU reading 0 °C.
    fn gpu_temperature(&self) -> Reading<f64> {
        self.access
            .commands
            .run(
                "nvidia-smi",
                &["--query-gpu=temperature.gpu", "--format=csv,noheader"],
            )
            .and_then(|out| {
                let line = parse::first_line(&out)
                    .ok_or_else(|| Unavailable::parse("nvidia-smi printed nothing"))?;
                parse::scaled(line, 1.0, "nvidia-smi temperature")
            })
            .inspect_err(note(Facet::GpuTemperature))
    }

    fn cpu_load(&self) -> Reading<CpuLoad> {
        portable::cpu_load(&self.access).inspect_err(note(Facet::CpuLoad))
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
        self.ram_speed_from_dmi().inspect_err(note(Facet::RamSpeed))
    }

    fn cpu_info(&self) -> Reading<CpuInfo> {
        self.read(CPUINFO)
            .and_then(|text| {
                let info = parse::cpuinfo(&text);
                if info.is_empty() {
                    return Err(Unavailable::parse("no known keys in /proc/cpuinfo"));
                }
                Ok(info)
            })
            .inspect_err(note(Facet::CpuInfo))
    }

    fn gpu_info(&self) -> Reading<GpuInfo> {
        self.access
            .commands
            .run("lspci", &["-v"])
            .and_then(|out| {
                let info = parse::lspci_vga(&out);
                if info.is_empty() {
                    return Err(Unavailable::parse("no VGA controller in lspci output"));
                }
                Ok(info)
            })
            .inspect_err(note(Facet::GpuInfo))
    }

    fn battery_status(&self) -> Reading<BatteryStatus> {
        let read = || -> Reading<BatteryStatus> {
            let dir = self.battery_dir()?;

            // energy_* (µWh) drains at power_now (µW); charge_* (µAh) at
            // current_now (µA). The two families are never mixed.
            let gauge = |now: &str, full: &str, rate: &str| {
                (
                    self.read_i64(dir.join(now)),
                    self.read_i64(dir.join(full)),
                    self.read_i64(dir.join(rate)),
                )
            };
            let (energy_now, energy_full, power_now) =
                match gauge("energy_now", "energy_full", "power_now") {
                    energy @ (Some(_), _, _) => energy,
                    _ => gauge("charge_now", "charge_full", "current_now"),
                };

            let percent = match (energy_now, energy_full) {
                (Some(now), Some(full)) if full > 0 => {
                    (now as f64 / full as f64 * 100.0).clamp(0.0, 100.0)
                }
                _ => self
                    .read_i64(dir.join("capacity"))
                    .map(|c| c.clamp(0, 100) as f64)
                    .ok_or_else(|| {
                        Unavailable::SourceUnavailable(format!(
                            "{} exposes neither energy nor capacity",
                            dir.display()
                        ))
                    })?,
            };

            let status = self.read_trimmed(dir.join("status"));
            let power_plugged = self.ac_online().or(match status.as_deref() {
                Some("Charging") | Some("Full") => Some(true),
                Some("Discharging") => Some(false),
                _ => None,
            });

            let time_left = match (power_plugged, energy_now, power_now) {
                (Some(true), _, _) => TimeLeft::Unlimited,
                (_, Some(now), Some(rate)) if rate != 0 => {
                    TimeLeft::Seconds((now as f64 / rate.unsigned_abs() as f64 * 3600.0) as u64)
                }
                _ => TimeLeft::Unknown,
            };

            Ok(BatteryStatus {
                percent: parse::round2(percent),
                time_left,
                power_plugged,
            })
        };
        read().inspect_err(note(Facet::BatteryStatus))
    }

    fn power_status(&self) -> Reading<PowerStatus> {
        Err(Unavailable::not_applicable(
            "power status comes from Win32_Battery",
        ))
        .inspect_err(note(Facet::PowerStatus))
    }

    /// `charge_full` is in µAh; reported in mAh.
    fn battery_capacity(&self) -> Reading<f64> {
        self.read(BAT0_CHARGE_FULL)
            .and_then(|raw| parse::scaled(&raw, 1000.0, "charge_full"))
            .inspect_err(note(Facet::BatteryCapacity))
    }

    /// `timezone_name` is the abbreviation in effect now (`CEST` in
    /// summer), unlike the Windows standard name.
    fn timezone(&self) -> Reading<TimezoneInfo> {
        self.access
            .commands
            .run("timedatectl", &["status"])
            .and_then(|out| parse::timedatectl_zone(&out))
            .map(|(timezone, timezone_name)| TimezoneInfo {
                timezone,
                timezone_name,
                dst: self.access.host.observes_dst(),
            })
            .inspect_err(note(Facet::Timezone))
    }

    fn keyboard_layout(&self) -> Reading<KeyboardLayout> {
        Err(Unavailable::not_applicable(
            "keyboard layout is read from the Windows registry",
        ))
        .inspect_err(note(Facet::KeyboardLayout))
    }

    fn screen_resolution(&self) -> Reading<ScreenResolution> {
        self.access
            .commands
            .run("xrandr", &[])
            .and_then(|out| parse::xrandr_resolution(&out))
            .map(|resolution| ScreenResolution { resolution })
            .inspect_err(note(Facet::ScreenResolution))
    }

    fn os_info(&self) -> Reading<OsInfo> {
        let facts = self.access.stats.os_facts();
        let release = facts
            .kernel_version
            .ok_or_else(|| Unavailable::SourceUnavailable("kernel release unknown".into()))
            .inspect_err(note(Facet::OsInfo))?;

        Ok(OsInfo {
            name: "posix".into(),
            system: "Linux".into(),
            release,
            version: self.read_trimmed(KERNEL_VERSION).unwrap_or_default(),
            architecture: format!("{}bit", usize::BITS),
            processor: facts.cpu_brand.unwrap_or(facts.arch),
        })
    }

    fn network_info(&self) -> Reading<NetworkInfo> {
        let read = || -> Reading<NetworkInfo> {
            let hostname = self.access.host.hostname()?;
            let ip_address = portable::resolve_address(&self.access, &hostname)?;
            let mac_address = parse::format_mac(self.node_id()?);
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

    /// Same lookup order as POSIX `setlocale`: `LC_ALL`, `LC_CTYPE`, `LANG`.
    fn language(&self) -> Reading<String> {
        ["LC_ALL", "LC_CTYPE", "LANG"]
            .into_iter()
            .filter_map(|key| self.access.host.env_var(key))
            .find(|v| !v.is_empty())
            .ok_or_else(|| Unavailable::SourceUnavailable("no locale variables set".into()))
            .and_then(|v| {
                parse::locale_tag(&v).ok_or_else(|| {
                    Unavailable::not_applicable(format!("locale {v:?} has no language tag"))
                })
            })
            .inspect_err(note(Facet::Language))
    }
}
