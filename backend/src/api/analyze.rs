use crate::config::AppConfig;
use crate::models::{AnalysisReport, ErrorResponse};
use crate::services::analyzer::AnalyzeRequest;
use crate::services::result_table::{SortKey, SortOrder};
use crate::services::video_service::VideoStrategy;
use crate::AppState;
use log::info;
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::{get, FromForm, Responder, State};

/// Form fields of the dashboard, as query parameters.
#[derive(Debug, FromForm)]
pub struct AnalyzeParams {
    pub topic: Option<String>,
    pub region: Option<String>,
    pub strategy: Option<String>,
    pub trending: bool,
    pub rising: bool,
    pub keywords: Vec<String>,
    pub selected: Vec<String>,
    pub max_results: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl AnalyzeParams {
    pub fn into_request(self, config: &AppConfig) -> Result<AnalyzeRequest, ErrorResponse> {
        let strategy = match self.strategy.as_deref() {
            Some(s) if !s.trim().is_empty() => s.parse::<VideoStrategy>().map_err(bad_request)?,
            _ => config.default_strategy,
        };

        let sort = match self.sort.as_deref() {
            Some(key) if !key.trim().is_empty() => {
                let key = key.parse::<SortKey>().map_err(bad_request)?;
                let order = match self.order.as_deref() {
                    Some(order) => order.parse::<SortOrder>().map_err(bad_request)?,
                    None => SortOrder::Desc,
                };
                Some((key, order))
            }
            _ => None,
        };

        let region = self
            .region
            .map(|r| r.trim().to_uppercase())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| config.default_region.clone());

        Ok(AnalyzeRequest {
            topic: self.topic.unwrap_or_default(),
            region,
            strategy,
            include_trending: self.trending,
            include_rising: self.rising,
            manual_keywords: self.keywords,
            selected: self.selected,
            max_results: self.max_results,
            sort,
        })
    }
}

fn bad_request(message: String) -> ErrorResponse {
    ErrorResponse {
        error: "Invalid parameter".to_string(),
        message,
    }
}

#[derive(Responder)]
#[response(status = 200, content_type = "text/csv")]
pub struct CsvExport {
    body: String,
    disposition: Header<'static>,
}

#[get("/?<params..>")]
pub async fn analyze_topic(
    params: AnalyzeParams,
    state: &State<AppState>,
) -> Result<Json<AnalysisReport>, ErrorResponse> {
    let request = params.into_request(&state.config)?;
    Ok(Json(state.analyzer.analyze(&request).await))
}

#[get("/csv?<params..>")]
pub async fn export_csv(
    params: AnalyzeParams,
    state: &State<AppState>,
) -> Result<CsvExport, ErrorResponse> {
    let request = params.into_request(&state.config)?;
    let report = state.analyzer.analyze(&request).await;
    info!("Exporting {} rows as CSV", report.rows.len());

    Ok(CsvExport {
        body: report.rows.to_csv(),
        disposition: Header::new(
            "Content-Disposition",
            "attachment; filename=\"youtube_data.csv\"",
        ),
    })
}
