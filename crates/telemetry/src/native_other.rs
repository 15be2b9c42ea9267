//! Registry and power-status stand-ins for non-Windows targets.

use crate::access::{Hive, PowerApi, Registry, SystemPowerStatus};
use crate::error::{Reading, Unavailable};

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRegistry;

impl Registry for NativeRegistry {
    fn read_string(&self, _hive: Hive, key: &str, _value: &str) -> Reading<String> {
        Err(Unavailable::not_applicable(format!(
            "no registry on {} (key {key})",
            std::env::consts::OS
        )))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NativePower;

impl PowerApi for NativePower {
    fn system_power_status(&self) -> Reading<SystemPowerStatus> {
        Err(Unavailable::not_applicable(format!(
            "GetSystemPowerStatus is not available on {}",
            std::env::consts::OS
        )))
    }
}
