// ABOUTME: Deploy command implementation.
// ABOUTME: Runs the deployer and optionally promotes the new revision.

use super::{cancel_on_interrupt, platform_for};
use strato::config::Config;
use strato::deploy::Deployer;
use strato::diagnostics::{Diagnostics, Warning};
use strato::error::Result;
use strato::output::Output;
use strato::release::{Releaser, TrafficPolicy};

/// Deploy the configured artifact; with `promote`, route all traffic to the
/// resulting revision.
pub async fn deploy(config: Config, mut output: Output, promote: bool) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    if !config.artifact.is_pinned() {
        diag.warn(Warning::unpinned_artifact(format!(
            "artifact {} is addressed by tag; its content can drift between deploys",
            config.artifact
        )));
    }
    if config.scaling.min == 0 {
        diag.warn(Warning::scale_to_zero(
            "min instances is 0; the first request after idle will cold-start",
        ));
    }

    let spec = config.to_deploy_spec()?;

    output.progress(&format!(
        "Deploying {} ({}) to {}/{}",
        config.service, config.artifact, config.project, config.region
    ));

    let cancel = cancel_on_interrupt();
    let deployer = Deployer::with_poll_settings(
        platform_for(&config),
        config.rollout.deploy_poll_settings(),
    );

    let revision = deployer.deploy(&config.artifact, &spec, &cancel).await?;
    output.progress(&format!(
        "  → Revision {} is {}",
        revision.id, revision.status
    ));

    if promote {
        output.progress("  → Promoting: routing 100% of traffic...");
        let releaser = Releaser::with_poll_settings(
            platform_for(&config),
            config.rollout.release_poll_settings(),
        );
        let policy = TrafficPolicy::single(revision.id.clone());
        let endpoint = releaser.release(&config.service, &policy, &cancel).await?;
        output.progress(&format!("  → Serving at {endpoint}"));
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.success("Deployment complete!");
    Ok(())
}
