//! Parsers for the unstructured text the platform sources emit.
//!
//! None of these formats are owned by us; every function fails soft and
//! reports a [`Unavailable::Parse`] instead of guessing.

use hostscope_protocol::{CpuInfo, GpuInfo};

use crate::error::{Reading, Unavailable};

/// Parses a trimmed numeric value and divides it by `divisor`.
///
/// ```text
/// "45000\n" / 1000.0 -> 45.0
/// ```
pub(crate) fn scaled(raw: &str, divisor: f64, what: &str) -> Reading<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Unavailable::parse(format!("{what}: empty value")));
    }
    trimmed
        .parse::<f64>()
        .map(|v| v / divisor)
        .map_err(|_| Unavailable::parse(format!("{what}: not a number: {trimmed:?}")))
}

/// Tenths of a degree Kelvin (ACPI thermal zones) to Celsius.
pub(crate) fn deci_kelvin_to_celsius(raw: f64) -> f64 {
    raw / 10.0 - 273.15
}

/// Returns the trimmed second line of a column-style report.
///
/// `WMIC CPU GET Temperature` prints a header line followed by the value.
pub(crate) fn second_line(output: &str) -> Option<&str> {
    output
        .lines()
        .nth(1)
        .map(str::trim)
        .filter(|l| !l.is_empty())
}

/// Returns the first non-empty trimmed line.
pub(crate) fn first_line(output: &str) -> Option<&str> {
    output.lines().map(str::trim).find(|l| !l.is_empty())
}

/// Splits `key : value` and returns the trimmed value.
fn value_after_colon(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, v)| v.trim())
}

/// Extracts the CPU description from `/proc/cpuinfo`.
///
/// Only the first processor block is considered; every core repeats the
/// same model, core count and cache size.
pub(crate) fn cpuinfo(text: &str) -> CpuInfo {
    let mut info = CpuInfo::default();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let slot = match key.trim() {
            "model name" => &mut info.model_name,
            "cpu cores" => &mut info.cores,
            "cpu MHz" => &mut info.clock_speed,
            "cache size" => &mut info.cache_size,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    info
}

/// Extracts the first VGA controller from `lspci -v` output.
///
/// ```text
/// 00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 620 (rev 07) (prog-if 00 [VGA controller])
///         Subsystem: Lenovo UHD Graphics 620
///         Flags: bus master, fast devsel, latency 0, IRQ 128
///         Memory at eb000000 (64-bit, non-prefetchable) [size=16M]
///         Memory at 60000000 (64-bit, prefetchable) [size=256M]
/// ```
///
/// The model is everything after the second colon of the header line. The
/// memory size is the `[size=...]` of the first `Memory` line in the block.
pub(crate) fn lspci_vga(text: &str) -> GpuInfo {
    let mut info = GpuInfo::default();
    let mut in_block = false;

    for line in text.lines() {
        if line.contains("VGA compatible controller") {
            if in_block {
                break;
            }
            in_block = true;
            info.model_name = line
                .splitn(3, ':')
                .nth(2)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string);
            continue;
        }
        if !in_block {
            continue;
        }
        if line.trim().is_empty() {
            break;
        }

        if info.memory_size.is_none() && line.contains("Memory") {
            info.memory_size = bracketed_size(line)
                .or_else(|| value_after_colon(line))
                .filter(|s| !s.is_empty())
                .map(str::to_string);
        } else if info.clock_speed.is_none() && line.to_ascii_lowercase().contains("clock") {
            info.clock_speed = value_after_colon(line)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
        }
    }

    info
}

fn bracketed_size(line: &str) -> Option<&str> {
    let start = line.find("[size=")? + "[size=".len();
    let end = line[start..].find(']')? + start;
    Some(&line[start..end])
}

/// Returns the active mode (`*`) from `xrandr` output.
///
/// ```text
/// eDP-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 309mm x 174mm
///    1920x1080     60.02*+  59.93
///    1680x1050     59.95    59.88
/// ```
pub(crate) fn xrandr_resolution(text: &str) -> Reading<String> {
    text.lines()
        .filter(|l| l.starts_with(char::is_whitespace))
        .find(|l| l.contains('*'))
        .and_then(|l| l.split_whitespace().next())
        .filter(|mode| mode.contains('x'))
        .map(str::to_string)
        .ok_or_else(|| Unavailable::parse("no active mode in xrandr output"))
}

/// Parses the `Time zone:` line of `timedatectl status`.
///
/// ```text
///                 Time zone: Europe/Berlin (CEST, +0200)
/// ```
///
/// Returns the zone identifier and its abbreviation.
pub(crate) fn timedatectl_zone(text: &str) -> Reading<(String, String)> {
    let value = text
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("Time zone"))
        .and_then(value_after_colon)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Unavailable::parse("no `Time zone` line in timedatectl output"))?;

    let (zone, rest) = match value.split_once(' ') {
        Some((zone, rest)) => (zone, rest),
        None => (value, ""),
    };
    let abbreviation = rest
        .trim()
        .trim_start_matches('(')
        .split(',')
        .next()
        .map(|a| a.trim().trim_end_matches(')'))
        .filter(|a| !a.is_empty())
        .unwrap_or(zone);

    Ok((zone.to_string(), abbreviation.to_string()))
}

/// Formats a 48-bit node identifier as `AA:BB:CC:DD:EE:FF`.
pub fn format_mac(node: u64) -> String {
    let hex = format!("{:012X}", node & 0xFFFF_FFFF_FFFF);
    hex.as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).into_owned())
        .collect::<Vec<_>>()
        .join(":")
}

/// Parses a hardware address written with `:` or `-` separators.
pub(crate) fn parse_mac(text: &str) -> Option<u64> {
    let digits: String = text
        .trim()
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .collect();
    if digits.len() != 12 {
        return None;
    }
    u64::from_str_radix(&digits, 16).ok()
}

/// First usable adapter address from `getmac /fo csv /nh`.
///
/// ```text
/// "AA-BB-CC-DD-EE-FF","\Device\Tcpip_{...}"
/// "N/A","Media disconnected"
/// ```
pub(crate) fn getmac_csv(text: &str) -> Reading<u64> {
    text.lines()
        .filter_map(|l| l.split(',').next())
        .map(|field| field.trim().trim_matches('"'))
        .filter_map(parse_mac)
        .find(|node| *node != 0)
        .ok_or_else(|| Unavailable::parse("no adapter address in getmac output"))
}

/// Extracts the `language_REGION` part of a POSIX locale string.
///
/// `"en_US.UTF-8"` and `"en_US@euro"` become `"en_US"`; `"C"` and
/// `"POSIX"` carry no language.
pub(crate) fn locale_tag(value: &str) -> Option<String> {
    let tag = value
        .split(['.', '@'])
        .next()
        .map(str::trim)
        .unwrap_or_default();
    match tag {
        "" | "C" | "POSIX" => None,
        t => Some(t.replace('-', "_")),
    }
}

/// Returns what follows `dmi:` in a modalias string.
pub(crate) fn modalias_dmi(text: &str) -> Option<&str> {
    text.trim()
        .split_once("dmi:")
        .map(|(_, id)| id.trim())
        .filter(|id| !id.is_empty())
}

/// `part / whole` as a percentage with one decimal, clamped to `[0, 100]`.
pub(crate) fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let pct = part as f64 / whole as f64 * 100.0;
    ((pct * 10.0).round() / 10.0).clamp(0.0, 100.0)
}

/// Rounds to two decimals.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
