// bases/update_check/src/main.rs
use clap::Parser;
use color_eyre::eyre::bail;
use color_eyre::Result;

mod check;
mod config;

fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout carries the plan
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "update_check=info,response_handler=info,system_state=info,action_processor=info"
                    .into()
            }),
        )
        .init();

    let args = config::CliArgs::parse();
    let config = config::Config::from_args(args);

    let response = config.load_response()?;
    let device = config.load_device_state()?;
    tracing::info!(
        "Handling response for version {} ({} URL(s)), official build: {}",
        response.version,
        response.payload_urls.len(),
        device.official_build
    );

    let result = check::run_check(&config, &response, device)?;

    if let Some(plan) = &result.output {
        println!("{}", serde_json::to_string_pretty(plan)?);
    }

    if result.code.is_error() {
        bail!("Update check response rejected: {}", result.code);
    }
    if !result.code.is_success() {
        tracing::info!("No update will be installed: {}", result.code);
    }

    Ok(())
}
