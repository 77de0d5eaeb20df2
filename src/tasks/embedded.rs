//! Updating the embedded Android-Components version inside an application
//!
//! Every application pins A-C the same way (`AndroidComponents.kt` under its
//! source prefix), so one pair of flavors covers Fenix, Focus and the
//! Reference Browser: a Nightly flavor for the development branch and a
//! release flavor for release branches, constrained to the embedded major.

use tracing::info;

use crate::engine::{self, FilePatch, Proposal, UpdateError, UpdateOutcome};
use crate::pins;
use crate::tasks::TaskContext;

/// An application repository embedding Android-Components.
pub struct AppTarget<'a> {
    /// Short product name used in work-branch names ("fenix", "focus", ...).
    pub product: &'a str,
    /// Repository, `owner/name`.
    pub repo: &'a str,
    /// Path prefix of the application's sources inside the repository.
    pub path_prefix: &'a str,
}

/// Bump the app's A-C pin to the latest Nightly on its development branch.
pub async fn update_nightly(
    ctx: &TaskContext<'_>,
    app: &AppTarget<'_>,
    branch: &str,
) -> Result<UpdateOutcome, UpdateError> {
    info!(
        "Updating Android-Components Nightly on {}:{branch}",
        app.repo
    );

    let path = pins::android_components_kt_path(app.path_prefix);
    let file = ctx.forge.get_file(app.repo, &path, branch).await?;
    let current = pins::embedded_components_version(&file.content)?;
    info!(
        "Current A-C version in {}:{branch} is {current}",
        app.repo
    );

    let latest = ctx.maven.latest_components_nightly_version().await?;
    info!("Latest A-C Nightly version available is {latest}");

    let proposal = Proposal {
        repo: app.repo.to_string(),
        base_branch: branch.to_string(),
        work_branch: format!("relbot/upgrade-ac-{}-main", app.product),
        dependency: "Android-Components Nightly".to_string(),
        current: current.to_string(),
        latest: latest.to_string(),
        title: format!("Update Android-Components from {current} to {latest} on {branch}"),
        body: format!(
            "This (automated) patch updates Android-Components on {branch} from {current} to {latest}."
        ),
        patches: vec![FilePatch::replace_token(
            path,
            format!("Update Android-Components to {latest}."),
            format!("VERSION = \"{current}\""),
            format!("VERSION = \"{latest}\""),
        )],
        follow_up_comment: None,
    };

    engine::propose_update(
        ctx.forge,
        ctx.author,
        ctx.dry_run,
        latest.cmp(&current),
        proposal,
    )
    .await
}

/// Bump the app's A-C pin on a release branch, staying on the embedded major.
pub async fn update_release(
    ctx: &TaskContext<'_>,
    app: &AppTarget<'_>,
    branch: &str,
    app_major: u32,
) -> Result<UpdateOutcome, UpdateError> {
    info!("Updating Android-Components on {}:{branch}", app.repo);

    let path = pins::android_components_kt_path(app.path_prefix);
    let file = ctx.forge.get_file(app.repo, &path, branch).await?;
    let current = pins::embedded_components_version(&file.content)?;
    info!(
        "Current A-C version in {}:{branch} is {current}",
        app.repo
    );

    let latest = ctx
        .maven
        .latest_components_version(Some(current.major))
        .await?;
    info!("Latest A-C {} version available is {latest}", current.major);

    let proposal = Proposal {
        repo: app.repo.to_string(),
        base_branch: branch.to_string(),
        work_branch: format!("relbot/upgrade-ac-{}-{app_major}", app.product),
        dependency: "Android-Components".to_string(),
        current: current.to_string(),
        latest: latest.to_string(),
        title: format!("Update Android-Components from {current} to {latest} on {branch}"),
        body: format!(
            "This (automated) patch updates Android-Components on {branch} from {current} to {latest}."
        ),
        patches: vec![FilePatch::replace_token(
            path,
            format!("Update Android-Components to {latest}."),
            format!("VERSION = \"{current}\""),
            format!("VERSION = \"{latest}\""),
        )],
        follow_up_comment: None,
    };

    engine::propose_update(
        ctx.forge,
        ctx.author,
        ctx.dry_run,
        latest.cmp(&current),
        proposal,
    )
    .await
}
