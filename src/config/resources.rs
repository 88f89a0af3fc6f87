// ABOUTME: Resource limit strings from the manifest, parsed to wire units.
// ABOUTME: Memory like "512Mi"/"1Gi", CPU like "500m" or whole cores.

use crate::error::{Error, Result};
use crate::platform::ResourceLimits;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourcesConfig {
    pub memory: Option<String>,
    pub cpu: Option<String>,
}

impl ResourcesConfig {
    /// Parse the configured strings into MiB / millicore limits.
    pub fn to_limits(&self) -> Result<ResourceLimits> {
        let memory_mib = self
            .memory
            .as_deref()
            .map(parse_memory_mib)
            .transpose()?;
        let cpu_millis = self.cpu.as_deref().map(parse_cpu_millis).transpose()?;

        Ok(ResourceLimits {
            memory_mib,
            cpu_millis,
        })
    }
}

/// Parse a memory string like "512Mi" or "2Gi" into MiB. A bare number is
/// taken as MiB.
fn parse_memory_mib(spec: &str) -> Result<u64> {
    let spec = spec.trim();
    let (number, multiplier) = if let Some(prefix) = spec.strip_suffix("Gi") {
        (prefix, 1024)
    } else if let Some(prefix) = spec.strip_suffix("Mi") {
        (prefix, 1)
    } else {
        (spec, 1)
    };

    number
        .parse::<u64>()
        .map(|n| n * multiplier)
        .map_err(|_| Error::InvalidConfig(format!("invalid memory limit: {spec}")))
}

/// Parse a CPU string like "500m" (millicores) or "2" (cores) into
/// millicores.
fn parse_cpu_millis(spec: &str) -> Result<u64> {
    let spec = spec.trim();
    if let Some(prefix) = spec.strip_suffix('m') {
        return prefix
            .parse::<u64>()
            .map_err(|_| Error::InvalidConfig(format!("invalid cpu limit: {spec}")));
    }

    spec.parse::<u64>()
        .map(|cores| cores * 1000)
        .map_err(|_| Error::InvalidConfig(format!("invalid cpu limit: {spec}")))
}
