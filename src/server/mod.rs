// src/server/mod.rs
use rocket::form::{Form, FromForm};
use rocket::fs::TempFile;
use rocket::http::{ContentType, Status};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, post, routes, Build, Rocket, State};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::error;

use crate::config::Config;
use crate::models::InputError;
use crate::output;
use crate::scraper::BatchRunner;
use crate::sources::{ContactSource, SingleUrlSource, SpreadsheetSource};

pub struct ServerState {
    pub config: Config,
}

pub fn build_rocket(config: Config) -> Rocket<Build> {
    rocket::build()
        .manage(ServerState { config })
        .mount("/api", routes![health_check, index, scrape])
}

#[get("/health")]
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "contact-scraper",
    }))
}

#[get("/")]
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "Contact Scraper",
        "version": "0.1.0",
        "description": "Extracts public contact details from websites",
        "endpoints": {
            "health": "/api/health",
            "scrape": "POST /api/scrape (form fields: url OR file)",
        }
    }))
}

#[derive(FromForm)]
pub struct ScrapeRequest<'r> {
    pub url: Option<String>,
    pub file: Option<TempFile<'r>>,
}

/// The stateless front door: hand in a URL or a spreadsheet, get the CSV
/// report back. Each request drives its own browser session.
#[post("/scrape", data = "<request>")]
pub async fn scrape(
    state: &State<ServerState>,
    mut request: Form<ScrapeRequest<'_>>,
) -> std::result::Result<(ContentType, String), Custom<Json<Value>>> {
    let config = state.config.clone();

    if let Some(url) = request.url.clone().filter(|u| !u.trim().is_empty()) {
        let body = run_pipeline(&config, SingleUrlSource::new(url.trim()))
            .await
            .and_then(|records| {
                output::single_report_string(
                    records.first().ok_or("scrape produced no record")?,
                )
            })
            .map_err(into_error_response)?;
        return Ok((ContentType::CSV, body));
    }

    if let Some(file) = request.file.as_mut() {
        let upload_path = upload_destination(&config);
        file.copy_to(&upload_path)
            .await
            .map_err(|e| into_error_response(Box::new(e)))?;

        let result = run_pipeline(&config, SpreadsheetSource::new(&upload_path))
            .await
            .and_then(|records| output::batch_report_string(&records));
        let _ = tokio::fs::remove_file(&upload_path).await;
        return result
            .map(|body| (ContentType::CSV, body))
            .map_err(into_error_response);
    }

    Err(Custom(
        Status::BadRequest,
        Json(json!({ "error": "No URL or file provided" })),
    ))
}

async fn run_pipeline(
    config: &Config,
    source: impl ContactSource,
) -> crate::models::Result<Vec<crate::models::ContactRecord>> {
    let targets = source.resolve_targets().await?;
    BatchRunner::new(config.clone()).run(&targets).await
}

fn upload_destination(config: &Config) -> PathBuf {
    PathBuf::from(&config.output.directory).join(format!("upload_{}", std::process::id()))
}

/// Input problems are the caller's fault; everything else is ours.
fn into_error_response(
    e: Box<dyn std::error::Error + Send + Sync>,
) -> Custom<Json<Value>> {
    error!("Scrape request failed: {e}");
    let status = if e.downcast_ref::<InputError>().is_some() {
        Status::BadRequest
    } else {
        Status::InternalServerError
    };
    Custom(status, Json(json!({ "error": e.to_string() })))
}
