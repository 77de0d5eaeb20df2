//! Focus tasks

use tracing::error;

use crate::discovery;
use crate::tasks::TaskContext;
use crate::tasks::embedded::{self, AppTarget};

/// Update the embedded Android-Components version on `main` and on the
/// recent Focus release branches.
pub async fn update_android_components(
    ctx: &TaskContext<'_>,
    focus_repo: &str,
) -> anyhow::Result<()> {
    let app = AppTarget {
        product: "focus",
        repo: focus_repo,
        path_prefix: "focus-android/",
    };

    if let Err(e) = embedded::update_nightly(ctx, &app, "main").await {
        error!("Failed to update A-C Nightly on {focus_repo}:main: {e}");
    }

    for major in discovery::recent_focus_majors(ctx.forge, focus_repo).await? {
        let branch = discovery::focus_branch_for_major(major);
        if let Err(e) = embedded::update_release(ctx, &app, &branch, major).await {
            error!("Failed to update A-C on {focus_repo}:{branch}: {e}");
        }
    }
    Ok(())
}
