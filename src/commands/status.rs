// ABOUTME: Status command implementation.
// ABOUTME: Reads service, revision, and routing state from the platform.

use super::platform_for;
use strato::config::Config;
use strato::error::Result;
use strato::output::Output;
use strato::platform::{DeploymentApi, RoutingApi};

/// Show the deployed revision and the current traffic split.
pub async fn status(config: Config, output: Output) -> Result<()> {
    let platform = platform_for(&config);

    output.progress(&format!(
        "Service {} in {}/{}",
        config.service, config.project, config.region
    ));

    let Some(remote) = platform.get_service(&config.service).await? else {
        output.progress("  Not deployed");
        return Ok(());
    };

    output.progress(&format!("  Artifact: {}", remote.descriptor.artifact));
    match remote.ready_revision {
        Some(ref revision) => {
            output.progress(&format!(
                "  Ready revision: {} (created {})",
                revision.id,
                revision.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        None => output.progress("  No ready revision"),
    }

    let routing = platform.get_routing(&config.service).await?;
    if routing.targets.is_empty() {
        output.progress("  No traffic routed");
    } else {
        for target in &routing.targets {
            output.progress(&format!("  {:>3}% → {}", target.percent, target.revision));
        }
    }
    if let Some(endpoint) = routing.endpoint {
        output.progress(&format!("  Endpoint: {endpoint}"));
    }

    Ok(())
}
