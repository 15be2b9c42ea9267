//! Management-instrumentation queries through the `wmic` tool.
//!
//! `wmic path <class> get <fields> /format:list` prints one `Key=Value`
//! line per field, with instances separated by blank lines:
//!
//! ```text
//!
//! CurrentTemperature=3132
//! InstanceName=ACPI\ThermalZone\GFXZ_0
//!
//! CurrentTemperature=3010
//! InstanceName=ACPI\ThermalZone\CPUZ_0
//! ```

use std::sync::Arc;

use crate::access::{CommandRunner, ManagementClient, WmiRow};
use crate::error::Reading;

/// WMI client that shells out to `wmic` via the shared command runner.
pub struct WmicClient {
    commands: Arc<dyn CommandRunner>,
}

impl WmicClient {
    pub fn new(commands: Arc<dyn CommandRunner>) -> Self {
        Self { commands }
    }
}

impl ManagementClient for WmicClient {
    fn query(
        &self,
        namespace: Option<&str>,
        class: &str,
        fields: &[&str],
    ) -> Reading<Vec<WmiRow>> {
        let namespace_arg = namespace.map(|ns| format!("/namespace:\\\\{ns}"));
        let field_list = fields.join(",");

        let mut args: Vec<&str> = Vec::with_capacity(6);
        if let Some(ns) = &namespace_arg {
            args.push(ns);
        }
        args.extend(["path", class, "get", field_list.as_str(), "/format:list"]);

        let output = self.commands.run("wmic", &args)?;
        Ok(parse_list(&output))
    }
}

/// Parses `/format:list` output into one row per instance.
pub(crate) fn parse_list(output: &str) -> Vec<WmiRow> {
    let mut rows = Vec::new();
    let mut current = WmiRow::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            current.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }

    rows
}
