//! Collects facets from a probe into a JSON report.

use std::path::Path;

use hostscope_protocol::Facet;
use hostscope_telemetry::{Probe, Reading, Unavailable};
use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::{Value, json};

/// Facet results in query order, serialized as one JSON object.
#[derive(Debug, Default)]
pub struct Report {
    entries: Vec<(Facet, Value)>,
}

impl Report {
    pub fn get(&self, facet: Facet) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(f, _)| *f == facet)
            .map(|(_, v)| v)
    }

    pub fn collected(&self) -> usize {
        self.entries.len()
    }

    pub fn unavailable_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, v)| v.get("unavailable").is_some())
            .count()
    }
}

impl Serialize for Report {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (facet, value) in &self.entries {
            map.serialize_entry(facet.as_str(), value)?;
        }
        map.end()
    }
}

fn unavailable(err: &Unavailable) -> Value {
    json!({ "unavailable": { "kind": err.kind(), "reason": err.reason() } })
}

/// Renders one reading as either its record or an `unavailable` object.
pub fn entry<T: Serialize>(reading: Reading<T>) -> Value {
    match reading {
        Ok(value) => serde_json::to_value(value).unwrap_or_else(|e| {
            unavailable(&Unavailable::parse(format!("unserializable value: {e}")))
        }),
        Err(err) => unavailable(&err),
    }
}

/// Queries `facets` in order. Duplicates are queried once.
pub fn collect(probe: &dyn Probe, facets: &[Facet], disk_path: &Path) -> Report {
    let mut report = Report::default();
    for &facet in facets {
        if report.get(facet).is_some() {
            continue;
        }
        let value = match facet {
            Facet::CpuTemperature => entry(probe.cpu_temperature()),
            Facet::GpuTemperature => entry(probe.gpu_temperature()),
            Facet::CpuLoad => entry(probe.cpu_load()),
            Facet::CpuFrequency => entry(probe.cpu_frequency()),
            Facet::CpuCores => entry(probe.cpu_cores()),
            Facet::CpuThreads => entry(probe.cpu_threads()),
            Facet::RamSpeed => entry(probe.ram_speed()),
            Facet::CpuInfo => entry(probe.cpu_info()),
            Facet::GpuInfo => entry(probe.gpu_info()),
            Facet::BatteryStatus => entry(probe.battery_status()),
            Facet::PowerStatus => entry(probe.power_status()),
            Facet::BatteryCapacity => entry(probe.battery_capacity()),
            Facet::Timezone => entry(probe.timezone()),
            Facet::KeyboardLayout => entry(probe.keyboard_layout()),
            Facet::ScreenResolution => entry(probe.screen_resolution()),
            Facet::OsInfo => entry(probe.os_info()),
            Facet::NetworkInfo => entry(probe.network_info()),
            Facet::MemoryInfo => entry(probe.memory_info()),
            Facet::DiskUsage => entry(probe.disk_usage(disk_path)),
            Facet::ProcessList => entry(probe.process_list()),
            Facet::BootTime => entry(probe.boot_time()),
            Facet::Language => entry(probe.language()),
        };
        report.entries.push((facet, value));
    }
    report
}
