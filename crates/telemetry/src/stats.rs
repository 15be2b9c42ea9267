//! Portable counters backed by `sysinfo` and `num_cpus`.
//!
//! Every call builds a fresh `System`, so nothing is cached between
//! queries. CPU usage needs two refreshes separated by
//! `MINIMUM_CPU_UPDATE_INTERVAL`; those calls block for that long.

use sysinfo::{Disks, ProcessesToUpdate, System};

use crate::access::{DiskSnapshot, MemorySnapshot, OsFacts, ProcessSnapshot, SystemStats};
use crate::error::{Reading, Unavailable};

#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoStats;

impl SystemStats for SysinfoStats {
    fn cpu_usage(&self) -> Reading<f64> {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_usage();
        if sys.cpus().is_empty() {
            return Err(Unavailable::SourceUnavailable("no CPUs reported".into()));
        }
        Ok(f64::from(sys.global_cpu_usage()))
    }

    fn cpu_frequency_mhz(&self) -> Reading<u64> {
        let mut sys = System::new();
        sys.refresh_cpu_frequency();
        match sys.cpus().first().map(|c| c.frequency()) {
            Some(mhz) if mhz > 0 => Ok(mhz),
            Some(_) => Err(Unavailable::SourceUnavailable(
                "CPU frequency not exposed".into(),
            )),
            None => Err(Unavailable::SourceUnavailable("no CPUs reported".into())),
        }
    }

    fn physical_cores(&self) -> Reading<usize> {
        match num_cpus::get_physical() {
            0 => Err(Unavailable::SourceUnavailable(
                "physical core count unknown".into(),
            )),
            n => Ok(n),
        }
    }

    fn logical_cpus(&self) -> Reading<usize> {
        match num_cpus::get() {
            0 => Err(Unavailable::SourceUnavailable("CPU count unknown".into())),
            n => Ok(n),
        }
    }

    fn memory(&self) -> Reading<MemorySnapshot> {
        let mut sys = System::new();
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return Err(Unavailable::SourceUnavailable(
                "total memory reported as zero".into(),
            ));
        }
        Ok(MemorySnapshot {
            total,
            available: sys.available_memory(),
            used: sys.used_memory(),
            free: sys.free_memory(),
        })
    }

    fn disks(&self) -> Reading<Vec<DiskSnapshot>> {
        let disks = Disks::new_with_refreshed_list();
        Ok(disks
            .list()
            .iter()
            .map(|d| DiskSnapshot {
                mount_point: d.mount_point().to_path_buf(),
                total: d.total_space(),
                available: d.available_space(),
            })
            .collect())
    }

    fn processes(&self) -> Reading<Vec<ProcessSnapshot>> {
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_processes(ProcessesToUpdate::All, true);

        Ok(sys
            .processes()
            .iter()
            .map(|(pid, process)| ProcessSnapshot {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                cpu_percent: f64::from(process.cpu_usage()),
                memory_bytes: process.memory(),
            })
            .collect())
    }

    fn boot_time(&self) -> Reading<u64> {
        match System::boot_time() {
            0 => Err(Unavailable::SourceUnavailable("boot time unknown".into())),
            t => Ok(t),
        }
    }

    fn os_facts(&self) -> OsFacts {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        OsFacts {
            kernel_version: System::kernel_version(),
            os_version: System::os_version(),
            cpu_brand: sys
                .cpus()
                .first()
                .map(|c| c.brand().trim().to_string())
                .filter(|b| !b.is_empty()),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_totals_are_plausible() {
        let mem = SysinfoStats.memory().unwrap();
        assert!(mem.total > 0);
        assert!(mem.available <= mem.total);
    }

    #[test]
    fn logical_cpus_at_least_physical() {
        let logical = SysinfoStats.logical_cpus().unwrap();
        if let Ok(physical) = SysinfoStats.physical_cores() {
            assert!(logical >= physical);
        }
    }

    #[test]
    fn processes_include_self() {
        let own = std::process::id();
        let procs = SysinfoStats.processes().unwrap();
        assert!(procs.iter().any(|p| p.pid == own));
    }

    #[test]
    fn os_facts_arch_matches_target() {
        assert_eq!(SysinfoStats.os_facts().arch, std::env::consts::ARCH);
    }
}
