//! Windows-only accessors: registry and system power status.

use crate::access::{Hive, PowerApi, Registry, SystemPowerStatus};
use crate::error::{Reading, Unavailable};

/// Registry reads through `winreg`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRegistry;

impl Registry for NativeRegistry {
    fn read_string(&self, hive: Hive, key: &str, value: &str) -> Reading<String> {
        use winreg::RegKey;
        use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

        let root = RegKey::predef(match hive {
            Hive::LocalMachine => HKEY_LOCAL_MACHINE,
            Hive::CurrentUser => HKEY_CURRENT_USER,
        });
        let subkey = root
            .open_subkey(key)
            .map_err(|e| Unavailable::from_io(format!("registry key {key}"), &e))?;
        subkey
            .get_value::<String, _>(value)
            .map_err(|e| Unavailable::from_io(format!("registry value {key}\\{value}"), &e))
    }
}

/// `GetSystemPowerStatus` through `windows-sys`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePower;

impl PowerApi for NativePower {
    fn system_power_status(&self) -> Reading<SystemPowerStatus> {
        use windows_sys::Win32::System::Power::{GetSystemPowerStatus, SYSTEM_POWER_STATUS};

        // SAFETY: SYSTEM_POWER_STATUS is plain data; zeroed is a valid value
        // and the call only writes into the struct we own.
        let mut status: SYSTEM_POWER_STATUS = unsafe { std::mem::zeroed() };
        let ok = unsafe { GetSystemPowerStatus(&mut status) };
        if ok == 0 {
            return Err(Unavailable::from_io(
                "GetSystemPowerStatus",
                &std::io::Error::last_os_error(),
            ));
        }

        Ok(SystemPowerStatus {
            ac_line_status: status.ACLineStatus,
            battery_flag: status.BatteryFlag,
            battery_life_percent: status.BatteryLifePercent,
            battery_life_time: status.BatteryLifeTime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_status_call_succeeds() {
        let status = NativePower.system_power_status().unwrap();
        assert!(status.battery_life_percent <= 100 || status.battery_life_percent == 255);
    }

    #[test]
    fn missing_registry_key_is_unavailable() {
        let err = NativeRegistry
            .read_string(Hive::CurrentUser, r"Software\hostscope\does-not-exist", "x")
            .unwrap_err();
        assert_eq!(err.kind(), "source_unavailable");
    }
}
