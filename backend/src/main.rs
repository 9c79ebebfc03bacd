use niche_finder::config::{self, AppConfig};
use log::info;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    config::load_environment();
    config::init_logger();

    let app_config = AppConfig::from_env();
    let cors = config::create_cors(&app_config)?;
    let state = config::create_app_state(app_config)?;

    info!("Launching Rocket...");
    niche_finder::build_rocket(state)
        .attach(cors)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {e}"))?;

    Ok(())
}
