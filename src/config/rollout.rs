// ABOUTME: Rollout polling configuration with humantime durations.
// ABOUTME: Converts to PollSettings for deploy and release waits.

use crate::platform::PollSettings;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct RolloutConfig {
    /// Delay before the first re-poll; doubles each round.
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Cap on the backed-off poll delay.
    #[serde(default = "default_max_poll_interval", with = "humantime_serde")]
    pub max_poll_interval: Duration,

    /// Overall bound on waiting for a deployment to become ready.
    #[serde(default = "default_deploy_timeout", with = "humantime_serde")]
    pub deploy_timeout: Duration,

    /// Overall bound on waiting for a routing change to settle.
    #[serde(default = "default_release_timeout", with = "humantime_serde")]
    pub release_timeout: Duration,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            max_poll_interval: default_max_poll_interval(),
            deploy_timeout: default_deploy_timeout(),
            release_timeout: default_release_timeout(),
        }
    }
}

impl RolloutConfig {
    pub fn deploy_poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval,
            max_interval: self.max_poll_interval,
            timeout: self.deploy_timeout,
        }
    }

    pub fn release_poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval,
            max_interval: self.max_poll_interval,
            timeout: self.release_timeout,
        }
    }
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_max_poll_interval() -> Duration {
    Duration::from_secs(15)
}

fn default_deploy_timeout() -> Duration {
    Duration::from_secs(600)
}

fn default_release_timeout() -> Duration {
    Duration::from_secs(300)
}
