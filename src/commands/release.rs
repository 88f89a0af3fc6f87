// ABOUTME: Release command implementation.
// ABOUTME: Builds the traffic policy from flags or config and applies it.

use super::{cancel_on_interrupt, platform_for};
use nonempty::NonEmpty;
use strato::config::Config;
use strato::error::{Error, Result};
use strato::output::Output;
use strato::platform::TrafficTarget;
use strato::release::{Releaser, TrafficPolicy};
use strato::types::RevisionId;

/// Apply a traffic split. Targets from the command line win over the
/// `traffic` section of the config.
pub async fn release(config: Config, mut output: Output, targets: Vec<String>) -> Result<()> {
    output.start_timer();

    let policy = if targets.is_empty() {
        config.traffic_policy()?.ok_or_else(|| {
            Error::InvalidConfig(
                "no traffic split configured; pass --to REVISION=PERCENT or add a `traffic` section"
                    .to_string(),
            )
        })?
    } else {
        parse_targets(&targets)?
    };

    output.progress(&format!(
        "Releasing {} in {}/{}",
        config.service, config.project, config.region
    ));

    let cancel = cancel_on_interrupt();
    let releaser = Releaser::with_poll_settings(
        platform_for(&config),
        config.rollout.release_poll_settings(),
    );

    let endpoint = releaser.release(&config.service, &policy, &cancel).await?;
    output.progress(&format!("  → Serving at {endpoint}"));

    output.success("Release complete!");
    Ok(())
}

/// Parse repeated `--to REVISION=PERCENT` flags into a policy.
fn parse_targets(raw: &[String]) -> Result<TrafficPolicy> {
    let mut targets = Vec::with_capacity(raw.len());

    for spec in raw {
        let (revision, percent) = spec.split_once('=').ok_or_else(|| {
            Error::InvalidConfig(format!(
                "invalid traffic target '{spec}', expected REVISION=PERCENT"
            ))
        })?;
        let percent: u8 = percent
            .parse()
            .map_err(|_| Error::InvalidConfig(format!("invalid percentage in '{spec}'")))?;
        targets.push(TrafficTarget::new(RevisionId::new(revision), percent));
    }

    let targets = NonEmpty::from_vec(targets)
        .ok_or_else(|| Error::InvalidConfig("at least one traffic target is required".to_string()))?;

    TrafficPolicy::new(targets).map_err(|e| Error::InvalidConfig(e.to_string()))
}
