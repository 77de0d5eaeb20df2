//! Fenix tasks

use tracing::error;

use crate::discovery;
use crate::tasks::TaskContext;
use crate::tasks::embedded::{self, AppTarget};

/// Update the embedded Android-Components version on `main` and on the
/// recent Fenix release branches.
pub async fn update_android_components(
    ctx: &TaskContext<'_>,
    fenix_repo: &str,
) -> anyhow::Result<()> {
    let app = AppTarget {
        product: "fenix",
        repo: fenix_repo,
        path_prefix: "",
    };

    if let Err(e) = embedded::update_nightly(ctx, &app, "main").await {
        error!("Failed to update A-C Nightly on {fenix_repo}:main: {e}");
    }

    for major in discovery::recent_fenix_majors(ctx.forge, fenix_repo).await? {
        let branch = discovery::fenix_branch_for_major(major);
        if let Err(e) = embedded::update_release(ctx, &app, &branch, major).await {
            error!("Failed to update A-C on {fenix_repo}:{branch}: {e}");
        }
    }
    Ok(())
}
