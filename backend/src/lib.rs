pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::analyzer::Analyzer;
use rocket::{get, routes, Build, Rocket};

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub analyzer: Analyzer,
    pub config: AppConfig,
}

#[get("/")]
fn index() -> &'static str {
    "YouTube niche finder is running"
}

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/", routes![index])
        .mount("/api/analyze", routes![api::analyze_topic, api::export_csv])
        .mount("/api/suggest", routes![api::get_suggestions])
        .mount("/api/score", routes![api::score_title])
}
