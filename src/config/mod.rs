// ABOUTME: Configuration types and parsing for strato.yml.
// ABOUTME: Handles YAML parsing, env interpolation, and destination merging.

mod env_value;
mod resources;
mod rollout;

pub use env_value::{EnvValue, resolve_env_map};
pub use resources::ResourcesConfig;
pub use rollout::RolloutConfig;

use crate::deploy::DeploySpec;
use crate::error::{Error, Result};
use crate::platform::{ScalingBounds, TrafficTarget};
use crate::release::TrafficPolicy;
use crate::types::{ArtifactRef, RevisionId, ServiceName};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "strato.yml";
pub const CONFIG_FILENAME_ALT: &str = "strato.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".strato/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceName,

    pub artifact: ArtifactRef,

    pub project: String,

    pub region: String,

    #[serde(default)]
    pub platform: PlatformConfig,

    #[serde(default)]
    pub scaling: ScalingConfig,

    #[serde(default)]
    pub concurrency: Option<u32>,

    #[serde(default)]
    pub resources: Option<ResourcesConfig>,

    #[serde(default)]
    pub env: HashMap<String, EnvValue>,

    #[serde(default)]
    pub labels: HashMap<String, String>,

    /// Desired traffic split for `strato release`. Absent means "route all
    /// traffic to whatever was deployed last".
    #[serde(default)]
    pub traffic: Option<Vec<TrafficEntry>>,

    #[serde(default)]
    pub rollout: RolloutConfig,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,
}

/// Where to reach the platform's admin API. Typically a local authenticated
/// gateway in front of the regional service.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8780".to_string()
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScalingConfig {
    #[serde(default)]
    pub min: u32,
    #[serde(default = "default_max_instances")]
    pub max: u32,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            min: 0,
            max: default_max_instances(),
        }
    }
}

impl ScalingConfig {
    pub fn to_bounds(self) -> ScalingBounds {
        ScalingBounds {
            min: self.min,
            max: self.max,
        }
    }
}

fn default_max_instances() -> u32 {
    100
}

/// One entry of the configured traffic split.
#[derive(Debug, Clone, Deserialize)]
pub struct TrafficEntry {
    pub revision: String,
    pub percent: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Destination {
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub platform: Option<PlatformConfig>,

    #[serde(default)]
    pub scaling: Option<ScalingConfig>,

    #[serde(default)]
    pub concurrency: Option<u32>,

    #[serde(default)]
    pub resources: Option<ResourcesConfig>,

    #[serde(default)]
    pub env: HashMap<String, EnvValue>,

    #[serde(default)]
    pub labels: HashMap<String, String>,

    #[serde(default)]
    pub traffic: Option<Vec<TrafficEntry>>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn for_destination(&self, name: &str) -> Result<Config> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref project) = dest.project {
            merged.project = project.clone();
        }

        if let Some(ref region) = dest.region {
            merged.region = region.clone();
        }

        if let Some(ref platform) = dest.platform {
            merged.platform = platform.clone();
        }

        if let Some(scaling) = dest.scaling {
            merged.scaling = scaling;
        }

        if dest.concurrency.is_some() {
            merged.concurrency = dest.concurrency;
        }

        if dest.resources.is_some() {
            merged.resources = dest.resources.clone();
        }

        // Deep merge env
        for (k, v) in &dest.env {
            merged.env.insert(k.clone(), v.clone());
        }

        // Deep merge labels
        for (k, v) in &dest.labels {
            merged.labels.insert(k.clone(), v.clone());
        }

        if dest.traffic.is_some() {
            merged.traffic = dest.traffic.clone();
        }

        Ok(merged)
    }

    /// Build the deploy spec from this configuration, resolving env
    /// interpolation and resource strings.
    pub fn to_deploy_spec(&self) -> Result<DeploySpec> {
        let resources = self
            .resources
            .as_ref()
            .map(|r| r.to_limits())
            .transpose()?
            .unwrap_or_default();

        Ok(DeploySpec {
            service: self.service.clone(),
            project: self.project.clone(),
            region: self.region.clone(),
            scaling: self.scaling.to_bounds(),
            concurrency: self.concurrency,
            resources,
            env: resolve_env_map(&self.env)?,
            labels: self
                .labels
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    /// Build the traffic policy from the configured split, if one is set.
    pub fn traffic_policy(&self) -> Result<Option<TrafficPolicy>> {
        let Some(ref entries) = self.traffic else {
            return Ok(None);
        };

        let targets: Vec<TrafficTarget> = entries
            .iter()
            .map(|entry| TrafficTarget::new(RevisionId::new(entry.revision.clone()), entry.percent))
            .collect();

        let targets = NonEmpty::from_vec(targets)
            .ok_or_else(|| Error::InvalidConfig("traffic split cannot be empty".to_string()))?;

        let policy =
            TrafficPolicy::new(targets).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        Ok(Some(policy))
    }

    pub fn template() -> Self {
        Config {
            service: ServiceName::new("my-app").unwrap(),
            artifact: ArtifactRef::parse("registry.example.com/team/my-app:latest").unwrap(),
            project: "my-project".to_string(),
            region: "us-central1".to_string(),
            platform: PlatformConfig::default(),
            scaling: ScalingConfig { min: 0, max: 4 },
            concurrency: None,
            resources: None,
            env: HashMap::new(),
            labels: HashMap::new(),
            traffic: None,
            rollout: RolloutConfig::default(),
            destinations: HashMap::new(),
        }
    }
}

pub fn init_config(
    dir: &Path,
    service: Option<&str>,
    artifact: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(s) = service {
        config.service = ServiceName::new(s).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    if let Some(a) = artifact {
        config.artifact =
            ArtifactRef::parse(a).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"service: {}
artifact: {}
project: {}
region: {}
scaling:
  min: {}
  max: {}
"#,
        config.service,
        config.artifact,
        config.project,
        config.region,
        config.scaling.min,
        config.scaling.max,
    )
}
