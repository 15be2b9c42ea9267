//! In-memory accessors for probe tests.
//!
//! Anything not explicitly faked reports `SourceUnavailable`, so a test
//! only has to describe the sources its facet reads. Every fake counts its
//! calls, which lets tests assert that a probe never touched the OS.

use std::collections::{BTreeSet, HashMap};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::access::{
    Access, CommandRunner, DiskSnapshot, FileSystem, Hive, HostInfo, ManagementClient,
    MemorySnapshot, OsFacts, PowerApi, ProcessSnapshot, Registry, SystemPowerStatus, SystemStats,
    WmiRow,
};
use crate::error::{Reading, Unavailable};

fn missing(what: impl std::fmt::Display) -> Unavailable {
    Unavailable::SourceUnavailable(format!("{what} not faked"))
}

#[derive(Default)]
pub(crate) struct FakeFs {
    files: Mutex<HashMap<PathBuf, Reading<String>>>,
    calls: AtomicUsize,
}

impl FakeFs {
    pub fn file(&self, path: impl Into<PathBuf>, contents: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), Ok(contents.to_string()));
    }

    pub fn deny(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let err = Unavailable::PermissionDenied(path.display().to_string());
        self.files.lock().unwrap().insert(path, Err(err));
    }
}

impl FileSystem for FakeFs {
    fn read_to_string(&self, path: &Path) -> Reading<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(missing(path.display())))
    }

    fn list_dir(&self, path: &Path) -> Reading<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let names: BTreeSet<String> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|k| k.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if names.is_empty() {
            return Err(missing(path.display()));
        }
        Ok(names.into_iter().collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeCommands {
    responses: Mutex<HashMap<String, Reading<String>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeCommands {
    pub fn respond(&self, line: &str, stdout: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(line.to_string(), Ok(stdout.to_string()));
    }

    pub fn fail(&self, line: &str, err: Unavailable) {
        self.responses
            .lock()
            .unwrap()
            .insert(line.to_string(), Err(err));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeCommands {
    fn run(&self, program: &str, args: &[&str]) -> Reading<String> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line.clone());
        self.responses
            .lock()
            .unwrap()
            .get(&line)
            .cloned()
            .unwrap_or_else(|| {
                Err(Unavailable::SourceUnavailable(format!(
                    "`{program}` not found"
                )))
            })
    }
}

#[derive(Default)]
pub(crate) struct FakeWmi {
    classes: Mutex<HashMap<String, Reading<Vec<WmiRow>>>>,
    calls: AtomicUsize,
}

impl FakeWmi {
    pub fn rows(&self, class: &str, rows: &[&[(&str, &str)]]) {
        let rows = rows
            .iter()
            .map(|fields| {
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<WmiRow>()
            })
            .collect();
        self.classes
            .lock()
            .unwrap()
            .insert(class.to_string(), Ok(rows));
    }

    pub fn fail(&self, class: &str, err: Unavailable) {
        self.classes
            .lock()
            .unwrap()
            .insert(class.to_string(), Err(err));
    }
}

impl ManagementClient for FakeWmi {
    fn query(
        &self,
        _namespace: Option<&str>,
        class: &str,
        _fields: &[&str],
    ) -> Reading<Vec<WmiRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.classes
            .lock()
            .unwrap()
            .get(class)
            .cloned()
            .unwrap_or_else(|| Err(missing(class)))
    }
}

#[derive(Default)]
pub(crate) struct FakeRegistry {
    values: Mutex<HashMap<(Hive, String, String), String>>,
    calls: AtomicUsize,
}

impl FakeRegistry {
    pub fn value(&self, hive: Hive, key: &str, name: &str, data: &str) {
        self.values
            .lock()
            .unwrap()
            .insert((hive, key.to_string(), name.to_string()), data.to_string());
    }
}

impl Registry for FakeRegistry {
    fn read_string(&self, hive: Hive, key: &str, value: &str) -> Reading<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .unwrap()
            .get(&(hive, key.to_string(), value.to_string()))
            .cloned()
            .ok_or_else(|| missing(format!("{key}\\{value}")))
    }
}

#[derive(Default)]
pub(crate) struct FakeHost {
    hostname: Mutex<Option<String>>,
    addresses: Mutex<HashMap<String, Vec<IpAddr>>>,
    env: Mutex<HashMap<String, String>>,
    dst: Mutex<bool>,
    calls: AtomicUsize,
}

impl FakeHost {
    pub fn hostname(&self, name: &str) {
        *self.hostname.lock().unwrap() = Some(name.to_string());
    }

    pub fn address(&self, host: &str, addr: IpAddr) {
        self.addresses
            .lock()
            .unwrap()
            .entry(host.to_string())
            .or_default()
            .push(addr);
    }

    pub fn env(&self, key: &str, value: &str) {
        self.env
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn dst(&self, observes: bool) {
        *self.dst.lock().unwrap() = observes;
    }
}

impl HostInfo for FakeHost {
    fn hostname(&self) -> Reading<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hostname
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| missing("hostname"))
    }

    fn resolve(&self, host: &str) -> Reading<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.addresses
            .lock()
            .unwrap()
            .get(host)
            .cloned()
            .ok_or_else(|| missing(format!("resolve {host}")))
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.env.lock().unwrap().get(key).cloned()
    }

    fn observes_dst(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.dst.lock().unwrap()
    }

    fn format_local(&self, timestamp: u64) -> Reading<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        chrono::DateTime::from_timestamp(timestamp as i64, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .ok_or_else(|| Unavailable::parse("timestamp out of range"))
    }
}

#[derive(Default)]
pub(crate) struct FakeStatsState {
    pub cpu_usage: Option<f64>,
    pub cpu_frequency_mhz: Option<u64>,
    pub physical_cores: Option<usize>,
    pub logical_cpus: Option<usize>,
    pub memory: Option<MemorySnapshot>,
    pub disks: Option<Vec<DiskSnapshot>>,
    pub processes: Option<Vec<ProcessSnapshot>>,
    pub boot_time: Option<u64>,
    pub os_facts: OsFacts,
}

#[derive(Default)]
pub(crate) struct FakeStats {
    pub state: Mutex<FakeStatsState>,
    calls: AtomicUsize,
}

impl FakeStats {
    fn get<T: Clone>(&self, what: &str, pick: impl FnOnce(&FakeStatsState) -> Option<T>) -> Reading<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pick(&self.state.lock().unwrap()).ok_or_else(|| missing(what))
    }
}

impl SystemStats for FakeStats {
    fn cpu_usage(&self) -> Reading<f64> {
        self.get("cpu usage", |s| s.cpu_usage)
    }

    fn cpu_frequency_mhz(&self) -> Reading<u64> {
        self.get("cpu frequency", |s| s.cpu_frequency_mhz)
    }

    fn physical_cores(&self) -> Reading<usize> {
        self.get("physical cores", |s| s.physical_cores)
    }

    fn logical_cpus(&self) -> Reading<usize> {
        self.get("logical cpus", |s| s.logical_cpus)
    }

    fn memory(&self) -> Reading<MemorySnapshot> {
        self.get("memory", |s| s.memory)
    }

    fn disks(&self) -> Reading<Vec<DiskSnapshot>> {
        self.get("disks", |s| s.disks.clone())
    }

    fn processes(&self) -> Reading<Vec<ProcessSnapshot>> {
        self.get("processes", |s| s.processes.clone())
    }

    fn boot_time(&self) -> Reading<u64> {
        self.get("boot time", |s| s.boot_time)
    }

    fn os_facts(&self) -> OsFacts {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().os_facts.clone()
    }
}

#[derive(Default)]
pub(crate) struct FakePower {
    status: Mutex<Option<SystemPowerStatus>>,
    calls: AtomicUsize,
}

impl FakePower {
    pub fn status(&self, status: SystemPowerStatus) {
        *self.status.lock().unwrap() = Some(status);
    }
}

impl PowerApi for FakePower {
    fn system_power_status(&self) -> Reading<SystemPowerStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.status
            .lock()
            .unwrap()
            .ok_or_else(|| missing("GetSystemPowerStatus"))
    }
}

/// A full set of fakes plus the [`Access`] bundle wired to them.
#[derive(Default)]
pub(crate) struct FakeAccess {
    pub fs: Arc<FakeFs>,
    pub commands: Arc<FakeCommands>,
    pub wmi: Arc<FakeWmi>,
    pub registry: Arc<FakeRegistry>,
    pub host: Arc<FakeHost>,
    pub stats: Arc<FakeStats>,
    pub power: Arc<FakePower>,
}

impl FakeAccess {
    pub fn access(&self) -> Access {
        Access {
            fs: self.fs.clone(),
            commands: self.commands.clone(),
            wmi: self.wmi.clone(),
            registry: self.registry.clone(),
            host: self.host.clone(),
            stats: self.stats.clone(),
            power: self.power.clone(),
        }
    }

    /// Total number of accessor calls made so far.
    pub fn calls(&self) -> usize {
        self.fs.calls.load(Ordering::SeqCst)
            + self.commands.calls.lock().unwrap().len()
            + self.wmi.calls.load(Ordering::SeqCst)
            + self.registry.calls.load(Ordering::SeqCst)
            + self.host.calls.load(Ordering::SeqCst)
            + self.stats.calls.load(Ordering::SeqCst)
            + self.power.calls.load(Ordering::SeqCst)
    }
}
