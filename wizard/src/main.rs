use anyhow::Context;
use clap::Parser;
use launchcore::MissionFlow;
use std::io;
use std::path::PathBuf;
use stub::StubBackend;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WizardConfig;
use workflow::driver::run_mission;
use workflow::plan::{MissionPlan, PlanInput};
use workflow::playback::ConsoleSink;
use workflow::prompt::PromptInput;
use workflow::runner::Orchestrator;

mod backend;
mod stub;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Step-by-step launch planning wizard")]
struct Args {
    /// Load wizard settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Answer every step from a YAML mission plan instead of prompting
    #[arg(long)]
    plan: Option<PathBuf>,
    /// Base URL of the trajectory backend
    #[arg(long)]
    backend: Option<String>,
    /// Mission flow: catalog or synthetic
    #[arg(long)]
    flow: Option<String>,
    #[arg(long)]
    step_interval_ms: Option<u64>,
    /// Also write the mission report into this directory
    #[arg(long)]
    report_dir: Option<PathBuf>,
    /// Run against an in-process stub backend
    #[arg(long, default_value_t = false)]
    stub: bool,
    /// Only serve the stub backend until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long)]
    stub_port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let flow = args
        .flow
        .as_deref()
        .map(str::parse::<MissionFlow>)
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let plan = args.plan.as_ref().map(MissionPlan::load).transpose()?;

    let flow = flow.or_else(|| plan.as_ref().and_then(|plan| plan.flow));
    let mut config = match &args.config {
        Some(path) => WizardConfig::load(path)?,
        None => WizardConfig::default(),
    };
    config.apply_overrides(
        args.backend.clone(),
        flow,
        args.step_interval_ms,
        args.report_dir.clone(),
    );
    if let Some(port) = args.stub_port {
        config.stub_port = port;
    }

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating tokio runtime")?;
    runtime.block_on(async move {
        if args.serve {
            serve_stub(config.stub_port).await
        } else {
            run(config, plan, args.stub).await
        }
    })
}

async fn serve_stub(port: u16) -> anyhow::Result<()> {
    let stub = StubBackend::spawn(([127, 0, 0, 1], port).into())?;
    println!("[STUB] Serving {} (Ctrl+C to stop)...", stub.base_url());
    signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
    Ok(())
}

async fn run(
    mut config: WizardConfig,
    plan: Option<MissionPlan>,
    with_stub: bool,
) -> anyhow::Result<()> {
    let _stub = if with_stub {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into())?;
        config.backend_url = stub.base_url();
        Some(stub)
    } else {
        None
    };

    let mut orchestrator = Orchestrator::new(config.clone()).context("configuring backend client")?;
    println!(
        "[WIZARD] {} mission against {}",
        config.flow,
        orchestrator.client().base_url()
    );

    let mut sink = ConsoleSink;
    let result = match plan {
        Some(plan) => run_mission(&mut orchestrator, &mut PlanInput::new(plan), &mut sink).await,
        None => {
            let mut input = PromptInput::new(io::stdin().lock(), io::stdout());
            run_mission(&mut orchestrator, &mut input, &mut sink).await
        }
    };

    let metrics = orchestrator.metrics();
    println!(
        "[WIZARD] remote calls {}, rejected answers {}, failed calls {}",
        metrics.remote_calls, metrics.rejections, metrics.failures
    );
    let outcome = result?;

    println!("[WIZARD] Visualization: {}", outcome.visualization);
    println!("[WIZARD] Report: {}", outcome.report);
    if let Some(path) = &outcome.report_path {
        println!("[WIZARD] Report saved to {}", path.display());
    }
    if let Some(collisions) = outcome.collisions {
        println!("[WIZARD] Collisions detected: {collisions}");
    }
    Ok(())
}
