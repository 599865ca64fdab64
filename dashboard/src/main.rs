use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use dashboard::admin::{AdminOutcome, CameraForm, ImageUpload, ModelForm};
use dashboard::dashboard::DEFAULT_REFRESH;
use dashboard::model::{CameraId, ModelId};
use dashboard::session::Session;
use dashboard::terminal::{self, TerminalInteraction};
use dashboard::view::{CameraDetails, ModelPreview, NavEntry};
use dashboard::{metrics, server, ApiClient, Dashboard, Scope};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about = "Monitoring dashboard for a camera fleet")]
struct Cli {
    /// Base URL of the fleet backend
    #[arg(
        long,
        env = "DASHBOARD_API_URL",
        default_value = "http://localhost:5000",
        global = true
    )]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Refresh the page now and then periodically until Ctrl-C
    Watch {
        /// Show one model instead of the whole fleet
        #[arg(long)]
        model: Option<String>,
        #[arg(long, env = "DASHBOARD_REFRESH_SECS", default_value_t = DEFAULT_REFRESH.as_secs())]
        interval_secs: u64,
        /// Serve Prometheus metrics on this address
        #[arg(long, env = "DASHBOARD_METRICS_ADDR")]
        metrics_addr: Option<SocketAddr>,
    },
    /// Refresh once and print the page
    Show {
        #[arg(long)]
        model: Option<String>,
    },
    /// Print the details of one camera
    Camera { id: CameraId },
    /// List camera models, optionally previewing one
    Models {
        #[arg(long)]
        select: Option<String>,
    },
    /// List every model and camera with their ids
    Admin,
    /// Add a camera to an existing model; every field is required
    AddCamera {
        #[arg(long, default_value = "")]
        model: String,
        #[command(flatten)]
        camera: CameraArgs,
    },
    /// Create a camera from the dashboard form, sent as typed
    NewCamera {
        #[arg(long, default_value = "")]
        model: String,
        #[command(flatten)]
        camera: CameraArgs,
    },
    /// Create a model together with its first camera
    AddModel(ModelArgs),
    /// Delete one camera
    DeleteCamera {
        id: CameraId,
        /// Skip the confirmation question
        #[arg(long)]
        yes: bool,
    },
    /// Delete a model and all of its cameras
    DeleteModel {
        id: ModelId,
        #[arg(long)]
        yes: bool,
    },
    /// Add storage and incidents to a camera's counters; prompts for each delta not given as a flag
    Feed {
        id: CameraId,
        #[arg(long)]
        gb: Option<f64>,
        #[arg(long)]
        incidents: Option<u64>,
    },
}

#[derive(Debug, Args)]
struct CameraArgs {
    #[arg(long = "serial", default_value = "")]
    serial_number: String,
    /// Installation date, e.g. 2024-03-01
    #[arg(long = "installed", default_value = "")]
    installation_date: String,
    #[arg(long = "location-x", default_value = "")]
    location_x: String,
    #[arg(long = "location-y", default_value = "")]
    location_y: String,
    /// Storage already used, in GB
    #[arg(long = "storage", default_value = "")]
    image_storage: String,
    #[arg(long = "incidents", default_value = "")]
    incidents_captured: String,
}

impl CameraArgs {
    fn into_form(self, model: String) -> CameraForm {
        CameraForm {
            model,
            serial_number: self.serial_number,
            installation_date: self.installation_date,
            location_x: self.location_x,
            location_y: self.location_y,
            image_storage: self.image_storage,
            incidents_captured: self.incidents_captured,
        }
    }
}

#[derive(Debug, Args)]
struct ModelArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Preview image uploaded with the model
    #[arg(long)]
    image: Option<PathBuf>,
    #[command(flatten)]
    camera: CameraArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url)
        .with_context(|| format!("invalid backend URL {}", cli.api_url))?;

    match cli.command {
        Command::Watch {
            model,
            interval_secs,
            metrics_addr,
        } => watch(client, scope(model), interval_secs, metrics_addr).await,
        Command::Show { model } => {
            let mut dashboard = Dashboard::new(client, scope(model));
            if !dashboard.refresh().await {
                bail!("could not load cameras from {}", cli.api_url);
            }
            println!("{}", terminal::render_page(&dashboard));
            Ok(())
        }
        Command::Camera { id } => {
            let camera = client
                .camera(id)
                .await
                .with_context(|| format!("could not load camera {}", id))?;
            println!("{}", terminal::render_details(&CameraDetails::from(&camera)));
            Ok(())
        }
        Command::Models { select } => {
            let models = client.list_models().await.context("could not load models")?;
            for entry in models.iter().map(NavEntry::from) {
                println!("{} ({})", entry.name, entry.href);
            }
            if let Some(preview) = ModelPreview::for_selection(&client, &models, select.as_deref())? {
                println!("\n{}", terminal::render_preview(&preview));
            }
            Ok(())
        }
        Command::Admin => {
            let mut session = admin_session(client, false);
            session.toggle_admin_panel().await;
            match session.listing() {
                Some(listing) => println!("{}", terminal::render_listing(listing)),
                None => bail!("could not load the admin listing"),
            }
            Ok(())
        }
        Command::AddCamera { model, camera } => {
            let mut session = admin_session(client, false);
            session.admin.open_add_camera(&model);
            session.admin.add_camera.form = camera.into_form(model);
            let outcome = session.submit_add_camera().await;
            report(&session, outcome)
        }
        Command::NewCamera { model, camera } => {
            let mut session = admin_session(client, false);
            session.admin.new_camera.open_with(camera.into_form(model));
            let outcome = session.submit_new_camera().await;
            report(&session, outcome)
        }
        Command::AddModel(args) => {
            let image = match &args.image {
                Some(path) => Some(
                    ImageUpload::from_path(path)
                        .await
                        .with_context(|| format!("could not read {}", path.display()))?,
                ),
                None => None,
            };
            let camera = args.camera;
            let form = ModelForm {
                name: args.name,
                description: args.description,
                image,
                serial_number: camera.serial_number,
                installation_date: camera.installation_date,
                location_x: camera.location_x,
                location_y: camera.location_y,
                image_storage: camera.image_storage,
                incidents_captured: camera.incidents_captured,
            };

            let mut session = admin_session(client, false);
            session.admin.new_model.open_with(form);
            let outcome = session.submit_new_model().await;
            report(&session, outcome)
        }
        Command::DeleteCamera { id, yes } => {
            let mut session = admin_session(client, yes);
            let outcome = session.delete_camera(id).await;
            report(&session, outcome)
        }
        Command::DeleteModel { id, yes } => {
            let mut session = admin_session(client, yes);
            let outcome = session.delete_model(id).await;
            report(&session, outcome)
        }
        Command::Feed { id, gb, incidents } => {
            let mut session = admin_session(client, false);
            let outcome = session.feed_camera_partial(id, gb, incidents).await;
            report(&session, outcome)
        }
    }
}

/// A blank model name means the whole fleet.
fn scope(model: Option<String>) -> Scope {
    match model {
        Some(name) if !name.trim().is_empty() => Scope::Model(name),
        _ => Scope::Fleet,
    }
}

fn admin_session(client: ApiClient, assume_yes: bool) -> Session<TerminalInteraction> {
    Session::new(
        Dashboard::new(client, Scope::Fleet),
        TerminalInteraction::assume_yes(assume_yes),
    )
}

async fn watch(
    client: ApiClient,
    scope: Scope,
    interval_secs: u64,
    metrics_addr: Option<SocketAddr>,
) -> anyhow::Result<()> {
    if let Some(addr) = metrics_addr {
        metrics::init_metrics()?;
        tokio::spawn(async move {
            if let Err(e) = server::serve(addr).await {
                error!("Metrics server failed: {}", e);
            }
        });
    }

    let mut dashboard = Dashboard::new(client, scope);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal");
    };

    dashboard
        .run(Duration::from_secs(interval_secs.max(1)), shutdown, |page| {
            println!("{}\n", terminal::render_page(page));
        })
        .await;
    Ok(())
}

fn report(session: &Session<TerminalInteraction>, outcome: AdminOutcome) -> anyhow::Result<()> {
    match outcome {
        AdminOutcome::Completed => {
            println!("{}", terminal::render_page(&session.dashboard));
            Ok(())
        }
        AdminOutcome::Declined => {
            println!("Cancelled, nothing was changed");
            Ok(())
        }
        AdminOutcome::NothingToSend => {
            println!("Nothing to send, counters left unchanged");
            Ok(())
        }
        AdminOutcome::Incomplete(missing) => bail!("missing fields: {}", missing.join(", ")),
        AdminOutcome::Invalid(message) => bail!(message),
        AdminOutcome::Failed => bail!("the backend rejected the request"),
        AdminOutcome::NotOpen => bail!("the form was not open"),
    }
}
