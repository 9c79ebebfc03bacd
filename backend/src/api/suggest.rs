use crate::AppState;
use log::warn;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/?<q>")]
pub async fn get_suggestions(q: Option<String>, state: &State<AppState>) -> Json<Vec<String>> {
    let topic = q.unwrap_or_default();
    match state.analyzer.suggest(&topic).await {
        Ok(suggestions) => Json(suggestions),
        Err(e) => {
            warn!("Failed to fetch suggestions for '{topic}': {e}");
            Json(vec![])
        }
    }
}
