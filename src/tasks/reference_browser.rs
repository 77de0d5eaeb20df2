//! Reference Browser tasks

use tracing::error;

use crate::tasks::TaskContext;
use crate::tasks::embedded::{self, AppTarget};

/// Update the embedded Android-Components version. The Reference Browser
/// only has `master`, tracking A-C Nightly.
pub async fn update_android_components(
    ctx: &TaskContext<'_>,
    rb_repo: &str,
) -> anyhow::Result<()> {
    let app = AppTarget {
        product: "reference-browser",
        repo: rb_repo,
        path_prefix: "",
    };

    if let Err(e) = embedded::update_nightly(ctx, &app, "master").await {
        error!("Failed to update A-C Nightly on {rb_repo}:master: {e}");
    }
    Ok(())
}
