//! Accessor seams between the probes and the operating system.
//!
//! Every probe reads the machine exclusively through an [`Access`] bundle.
//! The native bundle talks to the real OS; tests hand the probes in-memory
//! fakes instead.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Reading;

/// Read-only view of the (pseudo-)filesystem.
pub trait FileSystem: Send + Sync {
    /// Reads a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> Reading<String>;

    /// Lists entry names of a directory, sorted.
    fn list_dir(&self, path: &Path) -> Reading<Vec<String>>;
}

/// Runs external programs and returns their stdout.
pub trait CommandRunner: Send + Sync {
    /// Runs `program args...` to completion.
    ///
    /// A missing binary, a non-zero exit, or an expired timeout is an error.
    fn run(&self, program: &str, args: &[&str]) -> Reading<String>;
}

/// One instance returned by a management-instrumentation query.
pub type WmiRow = BTreeMap<String, String>;

/// Structured inventory/sensor queries (WMI on the Windows family).
pub trait ManagementClient: Send + Sync {
    /// Selects `fields` from every instance of `class`.
    ///
    /// `namespace` defaults to `root\CIMV2` when `None`.
    fn query(
        &self,
        namespace: Option<&str>,
        class: &str,
        fields: &[&str],
    ) -> Reading<Vec<WmiRow>>;
}

/// Registry root a key path is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hive {
    LocalMachine,
    CurrentUser,
}

/// Hierarchical configuration store (the Windows registry).
pub trait Registry: Send + Sync {
    fn read_string(&self, hive: Hive, key: &str, value: &str) -> Reading<String>;
}

/// Ambient host facts: names, resolution, environment, clock.
pub trait HostInfo: Send + Sync {
    fn hostname(&self) -> Reading<String>;

    /// Resolves a host name through the system resolver.
    fn resolve(&self, host: &str) -> Reading<Vec<IpAddr>>;

    fn env_var(&self, key: &str) -> Option<String>;

    /// Whether the local timezone switches offsets during the year.
    fn observes_dst(&self) -> bool;

    /// Formats a Unix timestamp as local `%Y-%m-%d %H:%M:%S`.
    fn format_local(&self, timestamp: u64) -> Reading<String>;
}

/// Memory totals in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub free: u64,
}

/// One mounted filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskSnapshot {
    pub mount_point: PathBuf,
    pub total: u64,
    pub available: u64,
}

/// One running process as sampled by the stats backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_bytes: u64,
}

/// Static OS identity as reported by the stats backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsFacts {
    pub kernel_version: Option<String>,
    pub os_version: Option<String>,
    pub cpu_brand: Option<String>,
    pub arch: String,
}

/// Portable counters (CPU, memory, disks, processes).
pub trait SystemStats: Send + Sync {
    /// System-wide CPU usage in percent, sampled over a short window.
    fn cpu_usage(&self) -> Reading<f64>;

    /// Current frequency of the first CPU in MHz.
    fn cpu_frequency_mhz(&self) -> Reading<u64>;

    fn physical_cores(&self) -> Reading<usize>;

    fn logical_cpus(&self) -> Reading<usize>;

    fn memory(&self) -> Reading<MemorySnapshot>;

    fn disks(&self) -> Reading<Vec<DiskSnapshot>>;

    fn processes(&self) -> Reading<Vec<ProcessSnapshot>>;

    /// Boot time as seconds since the Unix epoch.
    fn boot_time(&self) -> Reading<u64>;

    fn os_facts(&self) -> OsFacts;
}

/// Raw fields of the Windows `SYSTEM_POWER_STATUS` structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemPowerStatus {
    /// 0 offline, 1 online, 255 unknown.
    pub ac_line_status: u8,
    /// Bit flags; 128 means no system battery.
    pub battery_flag: u8,
    /// 0..=100, or 255 when unknown.
    pub battery_life_percent: u8,
    /// Seconds remaining, or `u32::MAX` when unknown.
    pub battery_life_time: u32,
}

/// System power status call (Windows family).
pub trait PowerApi: Send + Sync {
    fn system_power_status(&self) -> Reading<SystemPowerStatus>;
}

/// Options for the native accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Upper bound for any single external command.
    pub command_timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_secs(5),
        }
    }
}

/// Everything a probe may touch.
#[derive(Clone)]
pub struct Access {
    pub fs: Arc<dyn FileSystem>,
    pub commands: Arc<dyn CommandRunner>,
    pub wmi: Arc<dyn ManagementClient>,
    pub registry: Arc<dyn Registry>,
    pub host: Arc<dyn HostInfo>,
    pub stats: Arc<dyn SystemStats>,
    pub power: Arc<dyn PowerApi>,
}

impl Access {
    /// Accessors backed by the running operating system.
    pub fn native(options: &ProbeOptions) -> Self {
        let commands: Arc<dyn CommandRunner> =
            Arc::new(crate::command::TokioCommandRunner::new(options.command_timeout));
        Self {
            fs: Arc::new(crate::fs::StdFileSystem),
            wmi: Arc::new(crate::wmic::WmicClient::new(Arc::clone(&commands))),
            commands,
            registry: Arc::new(crate::os::NativeRegistry),
            host: Arc::new(crate::host::NativeHost),
            stats: Arc::new(crate::stats::SysinfoStats),
            power: Arc::new(crate::os::NativePower),
        }
    }
}
