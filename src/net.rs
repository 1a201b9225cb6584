//! Network counter acquisition for the net-monitor utility.

use crate::error::{Result, UtilError};
use crate::readings::{InterfaceCounters, NetReading};
use psutil::network::NetIoCountersCollector;

/// Samples per-interface I/O counters from the host.
pub struct NetSampler {
    collector: NetIoCountersCollector,
    interface: Option<String>,
}

impl NetSampler {
    /// Create a sampler, optionally filtered to one interface.
    ///
    /// Takes an initial snapshot so that a request for an interface the
    /// host does not have fails here, before any loop starts, with a
    /// message listing the interfaces that do exist.
    pub fn new(interface: Option<String>) -> Result<Self> {
        let mut collector = NetIoCountersCollector::default();
        let initial = collect(&mut collector)?;
        select_interfaces(initial, interface.as_deref())?;
        Ok(Self {
            collector,
            interface,
        })
    }

    /// Collect one tick's counters.
    ///
    /// Collector failures (and an interface that vanished mid-run) degrade
    /// to a no-data tick rather than stopping the loop.
    pub fn sample(&mut self) -> Result<Option<NetReading>> {
        let all = match collect(&mut self.collector) {
            Ok(all) => all,
            Err(err) => {
                tracing::warn!("failed to read network counters: {err}");
                return Ok(None);
            }
        };
        match select_interfaces(all, self.interface.as_deref()) {
            Ok(stats) => Ok(Some(stats)),
            Err(err) => {
                tracing::warn!("{err}");
                Ok(None)
            }
        }
    }
}

fn collect(collector: &mut NetIoCountersCollector) -> Result<NetReading> {
    let pernic = collector
        .net_io_counters_pernic()
        .map_err(|e| UtilError::read(format!("Error retrieving network stats: {e}")))?;

    Ok(pernic
        .into_iter()
        .map(|(name, counters)| {
            (
                name,
                InterfaceCounters {
                    bytes_sent: counters.bytes_sent(),
                    bytes_recv: counters.bytes_recv(),
                    packets_sent: counters.packets_sent(),
                    packets_recv: counters.packets_recv(),
                    errors_in: counters.err_in(),
                    errors_out: counters.err_out(),
                    dropped_in: counters.drop_in(),
                    dropped_out: counters.drop_out(),
                },
            )
        })
        .collect())
}

/// Keep only the requested interface, or all of them when none was named.
///
/// An absent interface name is a configuration-class failure whose message
/// enumerates the interfaces that are available.
pub fn select_interfaces(mut all: NetReading, wanted: Option<&str>) -> Result<NetReading> {
    let Some(name) = wanted else {
        return Ok(all);
    };
    match all.remove(name) {
        Some(counters) => {
            let mut one = NetReading::new();
            one.insert(name.to_string(), counters);
            Ok(one)
        }
        None => {
            let available: Vec<&str> = all.keys().map(String::as_str).collect();
            Err(UtilError::config(format!(
                "Interface '{name}' not found. Available: {available:?}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_counters() -> NetReading {
        let mut all = NetReading::new();
        all.insert(
            "eth0".to_string(),
            InterfaceCounters {
                bytes_sent: 1000,
                bytes_recv: 2000,
                ..Default::default()
            },
        );
        all.insert("wlan0".to_string(), InterfaceCounters::default());
        all
    }

    #[test]
    fn test_select_all_interfaces() {
        let selected = select_interfaces(sample_counters(), None).unwrap();
        assert_eq!(selected.len(), 2);
        assert!(selected.contains_key("eth0"));
        assert!(selected.contains_key("wlan0"));
    }

    #[test]
    fn test_select_single_interface() {
        let selected = select_interfaces(sample_counters(), Some("eth0")).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected["eth0"].bytes_sent, 1000);
    }

    #[test]
    fn test_missing_interface_lists_available() {
        let err = select_interfaces(sample_counters(), Some("ppp0")).unwrap_err();
        assert!(err.is_config());
        let message = err.to_string();
        assert!(message.contains("'ppp0'"));
        assert!(message.contains("eth0"));
        assert!(message.contains("wlan0"));
    }
}
