//! Android-Components monorepo tasks
//!
//! The A-C repository consumes two upstream dependencies (GeckoView and
//! Application-Services, the latter dragging Glean along) and is itself
//! released from `version.txt`. All three concerns live here: updating
//! GeckoView, updating A-S, and cutting releases on the relevant branches.

use tracing::{error, info, warn};

use crate::discovery;
use crate::engine::{self, FilePatch, Proposal, UpdateError, UpdateOutcome};
use crate::pins::{self, ComponentsBranch};
use crate::tasks::TaskContext;
use crate::version::{AppServicesVersion, ComponentVersion, appservices};

/// First A-C major whose releases are cut from Ship-It instead of here.
const SHIP_IT_FIRST_MAJOR: u32 = 104;

/// Update Application-Services and GeckoView on `main`.
pub async fn update_main(ctx: &TaskContext<'_>, components_repo: &str) -> anyhow::Result<()> {
    let target = ComponentsBranch::Main;
    if let Err(e) = update_application_services(ctx, components_repo, &target).await {
        error!(
            "Failed to update A-S on {components_repo}:{}: {e}",
            target.branch_name()
        );
    }
    if let Err(e) = update_geckoview(ctx, components_repo, &target).await {
        error!(
            "Failed to update GeckoView on {components_repo}:{}: {e}",
            target.branch_name()
        );
    }
    Ok(())
}

/// Update GeckoView on every relevant A-C release branch.
pub async fn update_releases(
    ctx: &TaskContext<'_>,
    components_repo: &str,
    fenix_repo: &str,
) -> anyhow::Result<()> {
    for major in discovery::relevant_components_majors(ctx.forge, fenix_repo).await? {
        let target = ComponentsBranch::Release(major);
        if let Err(e) = update_geckoview(ctx, components_repo, &target).await {
            error!(
                "Failed to update GeckoView on {components_repo}:{}: {e}",
                target.branch_name()
            );
        }
    }
    Ok(())
}

/// Cut an A-C release on every relevant release branch that changed its
/// `version.txt` and has no release yet.
pub async fn create_releases(
    ctx: &TaskContext<'_>,
    components_repo: &str,
    fenix_repo: &str,
) -> anyhow::Result<()> {
    for major in discovery::relevant_components_majors(ctx.forge, fenix_repo).await? {
        if major >= SHIP_IT_FIRST_MAJOR {
            warn!("Skipping Android-Components {major}: releases are now created on Ship-It");
            continue;
        }
        if let Err(e) = create_release(ctx, components_repo, major).await {
            error!("Failed to create Android-Components {major} release: {e}");
        }
    }
    Ok(())
}

/// Update GeckoView (and its bundled Glean) on one A-C branch.
pub async fn update_geckoview(
    ctx: &TaskContext<'_>,
    repo: &str,
    target: &ComponentsBranch,
) -> Result<UpdateOutcome, UpdateError> {
    let branch = target.branch_name();
    info!("Updating GeckoView on {repo}:{branch}");

    let gecko_kt = ctx
        .forge
        .get_file(repo, pins::gecko_kt_path(target), &branch)
        .await?;
    let channel = pins::gecko_channel(&gecko_kt.content)?;
    info!("Current GV channel is {channel}");

    // Pre-monorepo branches keep one version constant per channel.
    let old_style_pin = !target.monorepo_layout();
    let current = if old_style_pin {
        pins::gecko_channel_version(&gecko_kt.content, channel)?
    } else {
        pins::gecko_version(&gecko_kt.content)?
    };
    info!(
        "Current GV {} version in {repo}:{branch} is {current}",
        channel.display_name()
    );

    // main always tracks the newest GeckoView; release branches stay on
    // their pinned major.
    let major = match target {
        ComponentsBranch::Main => None,
        ComponentsBranch::Release(_) => Some(current.major),
    };
    let latest = ctx.maven.latest_gecko_version(major, channel).await?;
    info!(
        "Latest GV {} version available is {latest}",
        channel.display_name()
    );

    let dependencies = ctx
        .forge
        .get_file(repo, pins::dependencies_kt_path(target), &branch)
        .await?;
    let current_glean = pins::glean_version(&dependencies.content)?;
    info!("Current Glean version in {repo}:{branch} is {current_glean}");
    let latest_glean = ctx
        .maven
        .latest_bundled_glean_version(&latest, channel)
        .await?;
    info!("Latest bundled Glean version available is {latest_glean}");

    let (old_token, new_token) = if old_style_pin {
        (
            format!("{channel}_version = \"{current}\""),
            format!("{channel}_version = \"{latest}\""),
        )
    } else {
        (
            format!("const val version = \"{current}\""),
            format!("const val version = \"{latest}\""),
        )
    };
    let mut patches = vec![FilePatch::replace_token(
        pins::gecko_kt_path(target),
        format!("Update GeckoView ({}) to {latest}.", channel.display_name()),
        old_token,
        new_token,
    )];

    if current_glean != latest_glean {
        patches.push(FilePatch::replace_token(
            pins::dependencies_kt_path(target),
            format!("Update Glean to {latest_glean}."),
            format!("mozilla_glean = \"{current_glean}\""),
            format!("mozilla_glean = \"{latest_glean}\""),
        ));
    }

    // Release branches that still cut releases from here also ship the
    // GeckoView bump as a new dot release.
    if let ComponentsBranch::Release(ac_major) = target {
        if *ac_major < SHIP_IT_FIRST_MAJOR {
            let version_txt = ctx.forge.get_file(repo, "version.txt", &branch).await?;
            let current_components = pins::components_version_txt(&version_txt.content)?;
            let next_components = current_components.next_patch();
            info!(
                "Create an Android-Components {next_components} release with GV {} {latest}",
                channel.display_name()
            );
            patches.push(FilePatch::replace_token(
                "version.txt",
                format!("Set version.txt to {next_components}."),
                current_components.to_string(),
                next_components.to_string(),
            ));
            patches.push(FilePatch::substitute(
                "android-components/.buildconfig.yml",
                format!("Set version to {next_components}."),
                r"componentsVersion: \d+\.\d+\.\d+",
                format!("componentsVersion: {next_components}"),
            ));
        }
    }

    let proposal = Proposal {
        repo: repo.to_string(),
        base_branch: branch.clone(),
        work_branch: format!("relbot/upgrade-geckoview-ac-{}", target.short()),
        dependency: format!("GeckoView {}", channel.display_name()),
        current: current.to_string(),
        latest: latest.to_string(),
        title: format!(
            "Update GeckoView ({}) from {current} to {latest} on {branch}",
            channel.display_name()
        ),
        body: format!(
            "This (automated) patch updates GV {} on {branch} from {current} to {latest}.",
            channel.display_name()
        ),
        patches,
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

/// Update Application-Services on one A-C branch.
pub async fn update_application_services(
    ctx: &TaskContext<'_>,
    repo: &str,
    target: &ComponentsBranch,
) -> Result<UpdateOutcome, UpdateError> {
    let branch = target.branch_name();
    info!("Updating A-S on {repo}:{branch}");

    let dependencies = ctx
        .forge
        .get_file(repo, pins::dependencies_kt_path(target), &branch)
        .await?;
    let raw_current = pins::appservices_pin(&dependencies.content)?;
    info!("Current A-S version on {repo}:{branch} is {raw_current}");

    // Pins that bypass comparison are left alone; see
    // `appservices::comparison_bypass`.
    if appservices::comparison_bypass(&raw_current) {
        warn!("A-S pin {raw_current} does not take part in ordered comparison. Exiting.");
        return Ok(UpdateOutcome::UpToDate);
    }

    let current: AppServicesVersion = raw_current.parse()?;
    let channel = pins::appservices_channel(&dependencies.content)?;
    info!("Current A-S channel is {channel}");

    let latest = ctx
        .maven
        .latest_appservices_version(Some(current.major()), channel)
        .await?;
    info!("Latest A-S version available is {latest}");

    let ordering = latest.cmp(&current);
    let proposal = Proposal {
        repo: repo.to_string(),
        base_branch: branch.clone(),
        work_branch: format!("relbot/update-as/ac-{}", target.short()),
        dependency: "A-S".to_string(),
        current: raw_current.clone(),
        latest: latest.to_string(),
        title: format!("Update A-S from {raw_current} to {latest} on {branch}"),
        body: format!("This (automated) patch updates A-S from {raw_current} to {latest}."),
        patches: vec![FilePatch::replace_token(
            pins::dependencies_kt_path(target),
            format!("Update A-S to {latest}."),
            format!("mozilla_appservices = \"{raw_current}\""),
            format!("mozilla_appservices = \"{latest}\""),
        )],
        // A-S bumps ripple through the whole stack; ask for the extended
        // try run up front.
        follow_up_comment: Some("bors try".to_string()),
    };

    engine::propose_update(ctx.forge, ctx.author, ctx.dry_run, ordering, proposal).await
}

/// Cut a release for one A-C major, if `version.txt` names a dot release
/// that has no tag yet.
async fn create_release(
    ctx: &TaskContext<'_>,
    repo: &str,
    major: u32,
) -> Result<(), UpdateError> {
    let branch = ComponentsBranch::Release(major).branch_name();
    let version_txt = ctx.forge.get_file(repo, "version.txt", &branch).await?;
    let current = pins::components_version_txt(&version_txt.content)?;

    if current.patch == 0 {
        warn!("Current version {current} is not a dot release. Exiting.");
        return Ok(());
    }

    info!("Checking if android-components release {current} already exists.");

    let tags = ctx.forge.list_release_tags(repo).await?;
    let releases = tags
        .iter()
        .map(|tag| ComponentVersion::from_tag(tag))
        .collect::<Result<Vec<ComponentVersion>, _>>()?;
    if releases.is_empty() {
        warn!("No releases found. Exiting.");
        return Ok(());
    }
    if releases.contains(&current) {
        warn!("Release {current} already exists. Exiting.");
        return Ok(());
    }

    info!("Creating android-components release {current}");

    if ctx.dry_run {
        warn!("Dry-run so not continuing.");
        return Ok(());
    }

    let head = ctx.forge.branch_head(repo, &branch).await?;
    ctx.forge
        .create_release(
            repo,
            &format!("v{current}"),
            &current.to_string(),
            &format!("Release {current}"),
            &head,
        )
        .await?;
    Ok(())
}
