use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use relbot::artifact::MavenClient;
use relbot::config::Settings;
use relbot::forge::{self, ForgeClient};
use relbot::tasks::{self, TaskContext};

#[derive(Parser)]
#[command(name = "relbot")]
#[command(version, about = "Release automation for GeckoView and Android-Components consumers")]
struct Cli {
    #[command(subcommand)]
    product: Product,
}

#[derive(Subcommand)]
enum Product {
    /// Android-Components monorepo tasks
    #[command(name = "android-components")]
    AndroidComponents {
        #[command(subcommand)]
        command: ComponentsCommand,
    },
    /// Fenix tasks
    Fenix {
        #[command(subcommand)]
        command: AppCommand,
    },
    /// Focus tasks
    #[command(name = "focus-android")]
    FocusAndroid {
        #[command(subcommand)]
        command: AppCommand,
    },
    /// Reference Browser tasks
    #[command(name = "reference-browser")]
    ReferenceBrowser {
        #[command(subcommand)]
        command: AppCommand,
    },
}

#[derive(Subcommand)]
enum ComponentsCommand {
    /// Update A-S and GeckoView on main
    #[command(name = "update-main")]
    UpdateMain,
    /// Update GeckoView on the relevant release branches
    #[command(name = "update-releases")]
    UpdateReleases,
    /// Cut releases on the relevant release branches
    #[command(name = "create-releases", alias = "create-release")]
    CreateReleases,
}

#[derive(Subcommand)]
enum AppCommand {
    /// Update the embedded Android-Components version
    #[command(name = "update-android-components")]
    UpdateAndroidComponents,
}

fn main() -> anyhow::Result<()> {
    // Unknown products/commands print usage and exit 1; --help and
    // --version keep clap's own exit behavior.
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        use clap::error::ErrorKind;
        if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            err.exit();
        }
        let _ = err.print();
        std::process::exit(1);
    });

    let default_level = if std::env::var("DEBUG").is_ok() {
        "relbot=debug"
    } else {
        "relbot=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let settings = Settings::from_env()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, settings))
}

async fn run(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    let forge = ForgeClient::new(forge::DEFAULT_BASE_URL, &settings.token);

    let user = forge.authenticated_user().await?;
    info!(
        "This is relbot ({user}) working on https://github.com/{} as {} / {}",
        settings.organization, settings.author.email, settings.author.name
    );

    let maven = MavenClient::default();
    let ctx = TaskContext {
        forge: &forge,
        maven: &maven,
        author: &settings.author,
        dry_run: settings.dry_run,
    };

    match cli.product {
        Product::AndroidComponents { command } => {
            let components_repo = settings.repo("firefox-android");
            match command {
                ComponentsCommand::UpdateMain => {
                    tasks::android_components::update_main(&ctx, &components_repo).await
                }
                ComponentsCommand::UpdateReleases => {
                    tasks::android_components::update_releases(
                        &ctx,
                        &components_repo,
                        &settings.repo("fenix"),
                    )
                    .await
                }
                ComponentsCommand::CreateReleases => {
                    tasks::android_components::create_releases(
                        &ctx,
                        &components_repo,
                        &settings.repo("fenix"),
                    )
                    .await
                }
            }
        }
        Product::Fenix { command } => match command {
            AppCommand::UpdateAndroidComponents => {
                tasks::fenix::update_android_components(&ctx, &settings.repo("fenix")).await
            }
        },
        Product::FocusAndroid { command } => match command {
            AppCommand::UpdateAndroidComponents => {
                tasks::focus_android::update_android_components(
                    &ctx,
                    &settings.repo("focus-android"),
                )
                .await
            }
        },
        Product::ReferenceBrowser { command } => match command {
            AppCommand::UpdateAndroidComponents => {
                tasks::reference_browser::update_android_components(
                    &ctx,
                    &settings.repo("reference-browser"),
                )
                .await
            }
        },
    }
}
