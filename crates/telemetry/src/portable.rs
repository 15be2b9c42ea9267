//! Facets read the same way on every supported family.

use std::net::IpAddr;
use std::path::Path;

use hostscope_protocol::{BootTime, CpuLoad, DiskUsage, MemoryInfo, ProcessInfo};

use crate::access::Access;
use crate::error::{Reading, Unavailable};
use crate::parse::{percent, round2};

pub(crate) fn cpu_load(access: &Access) -> Reading<CpuLoad> {
    let usage = access.stats.cpu_usage()?;
    Ok(CpuLoad {
        usage: round2(usage.clamp(0.0, 100.0)),
    })
}

pub(crate) fn cpu_frequency(access: &Access) -> Reading<f64> {
    access.stats.cpu_frequency_mhz().map(|mhz| mhz as f64)
}

pub(crate) fn cpu_cores(access: &Access) -> Reading<usize> {
    access.stats.physical_cores()
}

pub(crate) fn cpu_threads(access: &Access) -> Reading<usize> {
    access.stats.logical_cpus()
}

/// Percent is `(total - available) / total`, which is what "in use" means
/// to a user; `used` and `free` are passed through as reported.
pub(crate) fn memory_info(access: &Access) -> Reading<MemoryInfo> {
    let mem = access.stats.memory()?;
    if mem.total == 0 {
        return Err(Unavailable::parse("total memory is zero"));
    }
    Ok(MemoryInfo {
        total: mem.total,
        available: mem.available,
        used: mem.used,
        free: mem.free,
        percent: percent(mem.total.saturating_sub(mem.available), mem.total),
    })
}

/// Picks the mounted filesystem with the longest mount point that contains
/// `path`.
pub(crate) fn disk_usage(access: &Access, path: &Path) -> Reading<DiskUsage> {
    let path = std::path::absolute(path)
        .map_err(|e| Unavailable::from_io(path.display(), &e))?;
    let disks = access.stats.disks()?;

    let disk = disks
        .iter()
        .filter(|d| path.starts_with(&d.mount_point))
        .max_by_key(|d| d.mount_point.components().count())
        .ok_or_else(|| {
            Unavailable::SourceUnavailable(format!("no mounted filesystem holds {}", path.display()))
        })?;

    if disk.total == 0 {
        return Err(Unavailable::parse(format!(
            "{} reports zero size",
            disk.mount_point.display()
        )));
    }

    let free = disk.available.min(disk.total);
    let used = disk.total - free;
    Ok(DiskUsage {
        total: disk.total,
        used,
        free,
        percent: percent(used, disk.total),
    })
}

/// Needs the memory total: without it no process has a meaningful share.
pub(crate) fn process_list(access: &Access) -> Reading<Vec<ProcessInfo>> {
    let total_memory = access.stats.memory()?.total;
    if total_memory == 0 {
        return Err(Unavailable::parse("total memory is zero"));
    }
    let processes = access.stats.processes()?;

    Ok(processes
        .into_iter()
        .map(|p| ProcessInfo {
            pid: p.pid,
            name: p.name,
            cpu_percent: round2(p.cpu_percent.max(0.0)),
            memory_percent: round2(
                (p.memory_bytes as f64 / total_memory as f64 * 100.0).clamp(0.0, 100.0),
            ),
        })
        .collect())
}

pub(crate) fn boot_time(access: &Access) -> Reading<BootTime> {
    let timestamp = access.stats.boot_time()?;
    Ok(BootTime {
        timestamp,
        formatted: access.host.format_local(timestamp)?,
    })
}

/// Resolves `hostname` and prefers an IPv4 address, like `gethostbyname`.
pub(crate) fn resolve_address(access: &Access, hostname: &str) -> Reading<String> {
    let addrs = access.host.resolve(hostname)?;
    addrs
        .iter()
        .find(|a| matches!(a, IpAddr::V4(_)))
        .or_else(|| addrs.first())
        .map(ToString::to_string)
        .ok_or_else(|| Unavailable::SourceUnavailable(format!("{hostname} has no addresses")))
}
