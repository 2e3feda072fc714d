//! Metric records and the persisted results document.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::comparison::MetricKind;
use crate::profile::{DeviceProfile, DiskBus, NicModel};

/// Current time as an ISO-8601 / RFC 3339 string.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// One profile's synthetic results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Name of the profile that produced the record
    pub config_name: String,
    /// Disk bus of the profile
    pub disk_type: DiskBus,
    /// NIC model of the profile
    pub network_type: NicModel,
    /// Seconds
    pub boot_time: f64,
    /// MB/s
    pub disk_read_speed: f64,
    /// MB/s
    pub disk_write_speed: f64,
    /// Mbps
    pub network_throughput: f64,
    /// Mean host CPU percent during the session
    pub cpu_overhead: f64,
    /// When the session started
    pub timestamp: String,
}

impl MetricRecord {
    /// An all-zero record echoing the profile's identity.
    pub fn for_profile(profile: &DeviceProfile, timestamp: impl Into<String>) -> Self {
        Self {
            config_name: profile.name.clone(),
            disk_type: profile.disk_type,
            network_type: profile.network_type,
            boot_time: 0.0,
            disk_read_speed: 0.0,
            disk_write_speed: 0.0,
            network_throughput: 0.0,
            cpu_overhead: 0.0,
            timestamp: timestamp.into(),
        }
    }

    /// Value of one metric.
    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::BootTime => self.boot_time,
            MetricKind::DiskRead => self.disk_read_speed,
            MetricKind::DiskWrite => self.disk_write_speed,
            MetricKind::NetworkThroughput => self.network_throughput,
            MetricKind::CpuOverhead => self.cpu_overhead,
        }
    }
}

/// The document written by a suite run and read by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    /// When the document was written
    pub timestamp: String,
    /// Records in [virtio, emulated] order
    pub metrics: Vec<MetricRecord>,
}

impl ResultsDocument {
    /// Wrap records with the current time.
    pub fn new(metrics: Vec<MetricRecord>) -> Self {
        Self {
            timestamp: iso_timestamp(),
            metrics,
        }
    }

    /// First record whose disk bus matches.
    pub fn record_for(&self, disk_type: DiskBus) -> Option<&MetricRecord> {
        self.metrics.iter().find(|m| m.disk_type == disk_type)
    }

    /// Whether slot 0 holds the virtio record and slot 1 the IDE one.
    ///
    /// Consumers index by position; this only lets callers warn about
    /// documents that break the convention.
    pub fn is_conventionally_ordered(&self) -> bool {
        match self.metrics.as_slice() {
            [first, second] => first.disk_type == DiskBus::Virtio && second.disk_type == DiskBus::Ide,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn record(profile: &DeviceProfile) -> MetricRecord {
        let mut r = MetricRecord::for_profile(profile, "2024-01-01T00:00:00Z");
        r.boot_time = 2.61;
        r.disk_read_speed = 451.25;
        r
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let r = record(&DeviceProfile::emulated(Path::new(".")));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["config_name"], "emulated");
        assert_eq!(json["disk_type"], "ide");
        assert_eq!(json["network_type"], "e1000");
        assert_eq!(json["boot_time"], 2.61);
        assert!(json.get("cpu_overhead").is_some());
    }

    #[test]
    fn value_maps_each_kind() {
        let r = record(&DeviceProfile::virtio(Path::new(".")));
        assert_eq!(r.value(MetricKind::BootTime), 2.61);
        assert_eq!(r.value(MetricKind::DiskRead), 451.25);
        assert_eq!(r.value(MetricKind::CpuOverhead), 0.0);
    }

    #[test]
    fn keyed_lookup_and_order_check() {
        let dir = Path::new(".");
        let v = record(&DeviceProfile::virtio(dir));
        let e = record(&DeviceProfile::emulated(dir));

        let doc = ResultsDocument::new(vec![v.clone(), e.clone()]);
        assert!(doc.is_conventionally_ordered());
        assert_eq!(doc.record_for(DiskBus::Ide).unwrap().config_name, "emulated");

        let swapped = ResultsDocument::new(vec![e, v]);
        assert!(!swapped.is_conventionally_ordered());
        assert_eq!(swapped.record_for(DiskBus::Virtio).unwrap().config_name, "virtio");
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let ts = iso_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
