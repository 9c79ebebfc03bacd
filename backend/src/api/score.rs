use crate::models::ScoreResponse;
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/?<title>&<keyword>")]
pub fn score_title(
    title: String,
    keyword: String,
    state: &State<AppState>,
) -> Json<ScoreResponse> {
    let scoring = state.analyzer.scoring();
    Json(ScoreResponse {
        score: scoring.score(&title, &keyword),
        breakdown: scoring.breakdown(&title, &keyword),
    })
}
