//! VolumeThresholds rule kind: the minimum volume, per device type and
//! time unit, below which consumption counts as "no real usage".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rill_core::{DeviceType, TimeUnit};

use crate::schema::CommonMetadata;

/// Volume used for any (device type, unit) pair the document leaves out.
const DEFAULT_FALLBACK: f64 = 1e-3;

// ── Provider trait ──────────────────────────────────────────────────

/// Source of volume thresholds consumed by the resolvers.
pub trait VolumeThresholdProvider: Send + Sync {
    /// Minimum meaningful volume (litres) for `device_type` over one `unit`.
    fn volume_threshold(&self, device_type: DeviceType, unit: TimeUnit) -> f64;
}

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level VolumeThresholds rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VolumeThresholdsRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: VolumeThresholdsSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VolumeThresholdsSpec {
    /// Threshold for pairs not listed under `devices`.
    #[serde(default = "default_fallback")]
    pub fallback: f64,
    /// Per device type, per time unit thresholds in litres.
    #[serde(default)]
    pub devices: BTreeMap<DeviceType, BTreeMap<TimeUnit, f64>>,
}

fn default_fallback() -> f64 {
    DEFAULT_FALLBACK
}

// ── Compiled type ───────────────────────────────────────────────────

/// Validated thresholds ready for lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledVolumeThresholds {
    fallback: f64,
    devices: BTreeMap<DeviceType, BTreeMap<TimeUnit, f64>>,
}

impl CompiledVolumeThresholds {
    /// Every threshold must be finite and strictly positive.
    pub fn new(spec: &VolumeThresholdsSpec) -> Result<Self, String> {
        check_positive("fallback", spec.fallback)?;
        for (device_type, units) in &spec.devices {
            for (unit, value) in units {
                check_positive(&format!("{device_type}/{unit}"), *value)?;
            }
        }
        Ok(Self {
            fallback: spec.fallback,
            devices: spec.devices.clone(),
        })
    }

    /// Thresholds that apply `value` to every pair.
    pub fn uniform(value: f64) -> Self {
        Self {
            fallback: value,
            devices: BTreeMap::new(),
        }
    }

    /// Builder-style override for a single pair (mainly for tests).
    pub fn with(mut self, device_type: DeviceType, unit: TimeUnit, value: f64) -> Self {
        self.devices.entry(device_type).or_default().insert(unit, value);
        self
    }
}

fn check_positive(what: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("volume threshold {what} must be positive, got {value}"))
    }
}

impl VolumeThresholdProvider for CompiledVolumeThresholds {
    fn volume_threshold(&self, device_type: DeviceType, unit: TimeUnit) -> f64 {
        self.devices
            .get(&device_type)
            .and_then(|units| units.get(&unit))
            .copied()
            .unwrap_or(self.fallback)
    }
}

impl VolumeThresholdsRule {
    pub fn compile(&self) -> Result<CompiledVolumeThresholds, String> {
        CompiledVolumeThresholds::new(&self.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../../../data/rules/insight/volume-thresholds.yml");

    #[test]
    fn parse_volume_thresholds_yaml() {
        let rule: VolumeThresholdsRule = serde_yaml::from_str(FIXTURE).unwrap();
        assert_eq!(rule.kind, "VolumeThresholds");
        let compiled = rule.compile().unwrap();
        assert_eq!(compiled.volume_threshold(DeviceType::Amphiro, TimeUnit::Day), 5.0);
        assert_eq!(compiled.volume_threshold(DeviceType::Meter, TimeUnit::Day), 50.0);
    }

    #[test]
    fn missing_pair_uses_fallback() {
        let yaml = r#"
apiVersion: v1
kind: VolumeThresholds
metadata:
  id: sparse
  name: Sparse thresholds
spec:
  fallback: 2.5
  devices:
    meter:
      day: 40
"#;
        let rule: VolumeThresholdsRule = serde_yaml::from_str(yaml).unwrap();
        let compiled = rule.compile().unwrap();
        assert_eq!(compiled.volume_threshold(DeviceType::Meter, TimeUnit::Day), 40.0);
        assert_eq!(compiled.volume_threshold(DeviceType::Meter, TimeUnit::Week), 2.5);
        assert_eq!(compiled.volume_threshold(DeviceType::Amphiro, TimeUnit::Day), 2.5);
    }

    #[test]
    fn fallback_defaults_when_omitted() {
        let yaml = r#"
apiVersion: v1
kind: VolumeThresholds
metadata:
  id: empty
  name: Empty
spec: {}
"#;
        let rule: VolumeThresholdsRule = serde_yaml::from_str(yaml).unwrap();
        let compiled = rule.compile().unwrap();
        assert_eq!(compiled.volume_threshold(DeviceType::Amphiro, TimeUnit::Hour), 1e-3);
    }

    #[test]
    fn non_positive_threshold_is_rejected() {
        let spec = VolumeThresholdsSpec {
            fallback: 1.0,
            devices: BTreeMap::from([(
                DeviceType::Amphiro,
                BTreeMap::from([(TimeUnit::Day, 0.0)]),
            )]),
        };
        let err = CompiledVolumeThresholds::new(&spec).unwrap_err();
        assert!(err.contains("AMPHIRO/DAY"), "{err}");
    }

    #[test]
    fn unknown_device_type_fails_to_parse() {
        let yaml = r#"
apiVersion: v1
kind: VolumeThresholds
metadata:
  id: bad
  name: Bad
spec:
  devices:
    dishwasher:
      day: 3
"#;
        assert!(serde_yaml::from_str::<VolumeThresholdsRule>(yaml).is_err());
    }

    #[test]
    fn builder_override() {
        let t = CompiledVolumeThresholds::uniform(1.0).with(DeviceType::Meter, TimeUnit::Day, 9.0);
        assert_eq!(t.volume_threshold(DeviceType::Meter, TimeUnit::Day), 9.0);
        assert_eq!(t.volume_threshold(DeviceType::Amphiro, TimeUnit::Day), 1.0);
    }
}
