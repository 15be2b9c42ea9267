//! Host identity, name resolution, environment and local clock.

use std::net::{IpAddr, ToSocketAddrs};

use chrono::{Datelike, Local, Offset, TimeZone};

use crate::access::HostInfo;
use crate::error::{Reading, Unavailable};

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeHost;

impl HostInfo for NativeHost {
    fn hostname(&self) -> Reading<String> {
        let name = hostname::get().map_err(|e| Unavailable::from_io("hostname", &e))?;
        name.into_string()
            .map_err(|_| Unavailable::parse("hostname is not valid UTF-8"))
    }

    fn resolve(&self, host: &str) -> Reading<Vec<IpAddr>> {
        let addrs = (host, 0)
            .to_socket_addrs()
            .map_err(|e| Unavailable::from_io(format!("resolve {host}"), &e))?;
        Ok(addrs.map(|a| a.ip()).collect())
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn observes_dst(&self) -> bool {
        let year = Local::now().year();
        let offset_at = |month: u32| {
            Local
                .with_ymd_and_hms(year, month, 1, 12, 0, 0)
                .single()
                .map(|t| t.offset().fix().local_minus_utc())
        };
        match (offset_at(1), offset_at(7)) {
            (Some(winter), Some(summer)) => winter != summer,
            _ => false,
        }
    }

    fn format_local(&self, timestamp: u64) -> Reading<String> {
        let secs = i64::try_from(timestamp)
            .map_err(|_| Unavailable::parse(format!("timestamp {timestamp} out of range")))?;
        Local
            .timestamp_opt(secs, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .ok_or_else(|| Unavailable::parse(format!("ambiguous local time for {timestamp}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_is_not_empty() {
        if let Ok(name) = NativeHost.hostname() {
            assert!(!name.is_empty());
        }
    }

    #[test]
    fn resolves_localhost() {
        let addrs = NativeHost.resolve("localhost").unwrap();
        assert!(addrs.iter().any(|a| a.is_loopback()));
    }

    #[test]
    fn format_local_shape() {
        let formatted = NativeHost.format_local(1_700_000_000).unwrap();
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(formatted.len(), 19);
        assert_eq!(&formatted[4..5], "-");
        assert_eq!(&formatted[10..11], " ");
    }
}
