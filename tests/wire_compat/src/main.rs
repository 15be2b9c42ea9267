fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use hostscope_protocol::{
        BatteryStatus, BootTime, CpuInfo, CpuLoad, DiskUsage, Facet, GpuInfo, KeyboardLayout,
        MemoryInfo, NetworkInfo, OsInfo, PowerStatus, ProcessInfo, ScreenResolution, TimeLeft,
        TimezoneInfo,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Normalizes numbers so that `65` and `65.0` compare as equal.
    fn normalize_value(v: &serde_json::Value) -> serde_json::Value {
        match v {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => serde_json::json!(f),
                None => v.clone(),
            },
            serde_json::Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), normalize_value(v)))
                    .collect(),
            ),
            serde_json::Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(normalize_value).collect())
            }
            _ => v.clone(),
        }
    }

    /// Deserializes a fixture, re-serializes it, and compares the JSON values
    /// (order-independent, float-normalized). Returns the parsed value.
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            normalize_value(&fixture),
            normalize_value(&reserialized),
            "roundtrip mismatch for {name}:\n  fixture: {fixture}\n  rust:    {reserialized}"
        );
        parsed
    }

    #[test]
    fn fixture_cpu_info() {
        let info: CpuInfo = roundtrip_test("cpu_info.json");
        assert_eq!(info.cache_size.as_deref(), Some("512 KB"));
    }

    #[test]
    fn fixture_gpu_info_omits_unknown_clock() {
        let info: GpuInfo = roundtrip_test("gpu_info.json");
        assert!(info.clock_speed.is_none());
    }

    #[test]
    fn fixture_battery_status() {
        let status: BatteryStatus = roundtrip_test("battery_status.json");
        assert_eq!(status.time_left, TimeLeft::Seconds(10800));
        assert_eq!(status.power_plugged, Some(false));
    }

    #[test]
    fn fixture_battery_status_plugged() {
        let status: BatteryStatus = roundtrip_test("battery_status_plugged.json");
        assert_eq!(status.time_left, TimeLeft::Unlimited);
    }

    #[test]
    fn fixture_battery_status_unknown() {
        let status: BatteryStatus = roundtrip_test("battery_status_unknown.json");
        assert_eq!(status.time_left, TimeLeft::Unknown);
        assert_eq!(status.power_plugged, None);
    }

    #[test]
    fn fixture_power_status() {
        roundtrip_test::<PowerStatus>("power_status.json");
    }

    #[test]
    fn fixture_timezone_info() {
        roundtrip_test::<TimezoneInfo>("timezone_info.json");
    }

    #[test]
    fn fixture_keyboard_layout() {
        roundtrip_test::<KeyboardLayout>("keyboard_layout.json");
    }

    #[test]
    fn fixture_screen_resolution() {
        roundtrip_test::<ScreenResolution>("screen_resolution.json");
    }

    #[test]
    fn fixture_os_info() {
        roundtrip_test::<OsInfo>("os_info.json");
    }

    #[test]
    fn fixture_network_info() {
        let info: NetworkInfo = roundtrip_test("network_info.json");
        assert_eq!(info.mac_address.split(':').count(), 6);
    }

    #[test]
    fn fixture_memory_info() {
        roundtrip_test::<MemoryInfo>("memory_info.json");
    }

    #[test]
    fn fixture_disk_usage() {
        roundtrip_test::<DiskUsage>("disk_usage.json");
    }

    #[test]
    fn fixture_process_list() {
        let list: Vec<ProcessInfo> = roundtrip_test("process_list.json");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn fixture_cpu_load() {
        roundtrip_test::<CpuLoad>("cpu_load.json");
    }

    #[test]
    fn fixture_boot_time() {
        roundtrip_test::<BootTime>("boot_time.json");
    }

    #[test]
    fn fixture_facet_names() {
        let facets: Vec<Facet> = roundtrip_test("facets.json");
        assert_eq!(facets, Facet::ALL.to_vec());
    }
}
