mod backend_bridge;
mod config;
mod controller;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use planner_client::PlannerClient;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::form::FormModel;
use crate::ui::VacationPlannerApp;

#[derive(Debug, Parser)]
#[command(name = "vacation-ai", version, about = "An AI assistant to plan your vacation")]
struct Args {
    /// Planning service endpoint (absolute http or https URL).
    #[arg(long)]
    endpoint: Option<String>,
    /// Abort plan requests after this many seconds; 0 waits forever.
    #[arg(long)]
    request_timeout_secs: Option<u64>,
    /// Reject travel dates after today.
    #[arg(long)]
    restrict_to_past_dates: bool,
    /// Fallback tracing filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_filter: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut settings = config::load_settings();
    settings.apply_overrides(
        args.endpoint,
        args.request_timeout_secs,
        args.restrict_to_past_dates,
    );
    let client_config = settings.client_config()?;
    let timeout = client_config.request_timeout;
    let client = PlannerClient::new(client_config).context("failed to build planning client")?;
    tracing::info!(endpoint = %client.endpoint(), ?timeout, "starting Vacation.ai");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    let _worker = backend_bridge::runtime::launch(cmd_rx, ui_tx, Arc::new(client));

    let form = FormModel::new(settings.date_bounds());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Vacation.ai")
            .with_inner_size([980.0, 640.0])
            .with_min_inner_size([720.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vacation.ai",
        options,
        Box::new(move |_cc| Ok(Box::new(VacationPlannerApp::new(cmd_tx, ui_rx, form)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run Vacation.ai window: {err}"))
}
