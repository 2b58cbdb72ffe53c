use std::time::Instant;

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse},
    Json,
};
use tracing::debug;

use crate::{constants::metrics::TEXT_CONTENT_TYPE, error::Error, metrics, services::Services};

pub async fn landing(State(services): State<Services>) -> impl IntoResponse {
    Html(format!(
        "<html>\
         <head><title>Qiniu CDN Exporter</title></head>\
         <body>\
         <h1>Qiniu CDN Exporter</h1>\
         <p><a href=\"{path}\">Metrics</a></p>\
         </body>\
         </html>",
        path = html_escape(&services.metrics_path)
    ))
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub async fn metrics(State(services): State<Services>) -> Result<impl IntoResponse, Error> {
    let started = Instant::now();
    let report = services.cdn_stats.scrape().await?;
    let body = metrics::render(&report, started.elapsed())?;

    debug!(target: "api::metrics", bytes = body.len(), "Rendered scrape");

    Ok(([(CONTENT_TYPE, TEXT_CONTENT_TYPE)], body))
}

pub async fn health_check(State(services): State<Services>) -> Result<impl IntoResponse, Error> {
    let response = services.health.check_health().await;
    Ok(Json(response))
}
