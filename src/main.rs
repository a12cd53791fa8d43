mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use devpal_action::outputs::{OutputWriter, escape_data};
use devpal_action::{ActionConfig, Orchestrator, Settings};
use log::{Level, LevelFilter, error, info};

fn main() {
    init_logger();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            println!("::error::Failed to create Tokio runtime: {}", escape_data(&e.to_string()));
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(real_main()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

/// Log records double as workflow commands, so warnings and the final
/// failure show up as annotations on the run.
fn init_logger() {
    // Set by the runner when step debug logging is enabled
    let level = if std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            use std::io::Write;
            let message = record.args().to_string();
            match record.level() {
                Level::Error => writeln!(buf, "::error::{}", escape_data(&message)),
                Level::Warn => writeln!(buf, "::warning::{}", escape_data(&message)),
                Level::Info => writeln!(buf, "{message}"),
                Level::Debug | Level::Trace => writeln!(
                    buf,
                    "::debug::[{}:{}] {}",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    escape_data(&message)
                ),
            }
        })
        .init();
}

async fn real_main() -> Result<()> {
    let args = cli::Args::parse();
    info!("Running DevPal Action");

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let config = ActionConfig::from_inputs(args.into_inputs(), settings)?;
    let outputs = OutputWriter::new(config.output_file.clone());

    let orchestrator = Orchestrator::new(config)?;
    let report = orchestrator.run().await?;

    outputs
        .publish_release(&report.release)
        .context("Failed to write action outputs")?;
    info!("Scan complete for release {}", report.release.tag_name);
    Ok(())
}
