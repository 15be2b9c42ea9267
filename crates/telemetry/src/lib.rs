//! Point-in-time hardware and operating-system telemetry.
//!
//! [`detect`] picks a [`Probe`] for the running OS family once; each of its
//! methods reads one facet (temperature, load, battery, network identity,
//! ...) and returns either the value or an [`Unavailable`] reason.

mod access;
mod command;
mod error;
mod fs;
mod host;
mod linux;
mod parse;
mod portable;
mod probe;
mod stats;
mod unsupported;
mod windows;
mod wmic;

#[cfg(target_os = "windows")]
#[path = "native_windows.rs"]
mod os;

#[cfg(not(target_os = "windows"))]
#[path = "native_other.rs"]
mod os;

#[cfg(test)]
mod fake;

pub use access::{
    Access, CommandRunner, DiskSnapshot, FileSystem, Hive, HostInfo, ManagementClient,
    MemorySnapshot, OsFacts, PowerApi, ProbeOptions, ProcessSnapshot, Registry,
    SystemPowerStatus, SystemStats, WmiRow,
};
pub use command::TokioCommandRunner;
pub use error::{Reading, Unavailable};
pub use fs::StdFileSystem;
pub use linux::LinuxProbe;
pub use parse::format_mac;
pub use probe::{Probe, detect, probe_for};
pub use unsupported::UnsupportedProbe;
pub use windows::WindowsProbe;
pub use wmic::WmicClient;
