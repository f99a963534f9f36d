//! Plain-text rendering of dashboard panels for the terminal.

use std::fmt::Write;

use anyhow::{Context, Result};
use common::{
    horizon_label, AnomalySeries, CitySentiments, ForecastResponse, ModelComparisonResponse,
    RiskGauge, Target,
};
use query::{ClassifiedError, ErrorKind, FetchResult, QuerySnapshot, ResourceData, ResourceKind, ResourceRequest, ResourceResult};
use serde_json::json;

/// Heading shown above a panel.
pub fn panel_title(request: &ResourceRequest) -> String {
    match (request.kind(), request.target()) {
        (ResourceKind::Forecast, Some(Target::Rent)) => "Rent forecast".to_string(),
        (ResourceKind::Forecast, _) => "Price forecast".to_string(),
        (ResourceKind::ModelComparison, Some(target)) => format!("Model comparison ({target})"),
        (ResourceKind::ModelComparison, None) => "Model comparison".to_string(),
        (ResourceKind::Cities, _) => "Cities".to_string(),
        (ResourceKind::Sentiment, _) => "Sentiment & news".to_string(),
        (ResourceKind::Risk, _) => "Risk gauge".to_string(),
        (ResourceKind::Anomalies, _) => "Market anomalies".to_string(),
    }
}

pub fn render_panel(request: &ResourceRequest, result: &FetchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", panel_title(request));
    match result {
        ResourceResult::Loading => out.push_str("  loading...\n"),
        ResourceResult::Error(error) => out.push_str(&render_error(error)),
        ResourceResult::Success(data) => out.push_str(&render_data(data)),
    }
    out
}

/// Like [`render_panel`] but marks data that is being refreshed.
pub fn render_snapshot(request: &ResourceRequest, snapshot: &QuerySnapshot) -> String {
    let mut out = render_panel(request, &snapshot.result);
    if snapshot.is_refreshing() {
        out.push_str("  (refreshing)\n");
    }
    out
}

pub fn render_error(error: &ClassifiedError) -> String {
    let label = match error.kind() {
        ErrorKind::NotFound => "no data",
        ErrorKind::HttpError | ErrorKind::Network => "error",
    };
    let mut out = format!("  [{}] {}\n", label, error.message());
    for line in error.details().lines() {
        let _ = writeln!(out, "    {}", line);
    }
    out
}

pub fn render_data(data: &ResourceData) -> String {
    match data {
        ResourceData::Cities(cities) => cities.iter().map(|c| format!("  {}\n", c)).collect(),
        ResourceData::Forecast(forecast) => render_forecast(forecast),
        ResourceData::Sentiment(sentiment) => render_sentiment(sentiment),
        ResourceData::Risk(risk) => render_risk(risk),
        ResourceData::Anomalies(series) => render_anomalies(series),
        ResourceData::ModelComparison(comparison) => render_model_comparison(comparison),
    }
}

/// JSON document for `--json` output: the payload, or the classified error.
pub fn to_json(request: &ResourceRequest, result: &FetchResult) -> Result<String> {
    let value = match result {
        ResourceResult::Loading => json!({ "key": request.key().as_str(), "loading": true }),
        ResourceResult::Error(error) => json!({ "key": request.key().as_str(), "error": error }),
        ResourceResult::Success(data) => json!({ "key": request.key().as_str(), "data": &**data }),
    };
    serde_json::to_string_pretty(&value).context("Failed to serialize result")
}

fn render_forecast(forecast: &ForecastResponse) -> String {
    let mut out = format!(
        "  {} {} forecast, {} horizon\n",
        forecast.city,
        forecast.target,
        forecast.horizon_label()
    );
    let _ = writeln!(out, "  {:<12} {:>14} {:>14} {:>14}", "date", "value", "lower", "upper");
    for point in &forecast.data {
        let _ = writeln!(
            out,
            "  {:<12} {:>14.2} {:>14} {:>14}",
            point.date,
            point.value,
            bound(point.lower),
            bound(point.upper)
        );
    }
    if let Some(last) = forecast.final_point() {
        let _ = writeln!(out, "  end of horizon: {:.2} ({})", last.value, last.date);
    }
    out
}

fn bound(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn render_sentiment(sentiment: &CitySentiments) -> String {
    let (pos, neg, neu) = sentiment.tally();
    let mut out = format!(
        "  {}: {} positive, {} negative, {} neutral\n",
        sentiment.city, pos, neg, neu
    );
    for item in &sentiment.items {
        let _ = writeln!(out, "  {} [{}] {}", item.date, item.sentiment.as_str(), item.headline);
    }
    out
}

fn render_risk(risk: &RiskGauge) -> String {
    let mut out = format!(
        "  {} risk score {:.0}/100 as of {}\n",
        risk.city,
        risk.gauge_score(),
        risk.date
    );
    for indicator in &risk.breakdown {
        let _ = writeln!(out, "  {:<28} {}", indicator.name, indicator.status.as_str());
    }
    out
}

fn render_anomalies(series: &[AnomalySeries]) -> String {
    let mut out = String::new();
    for s in series {
        let flagged: Vec<_> = s.flagged().collect();
        let _ = writeln!(
            out,
            "  {} {}: {} of {} months flagged",
            s.city,
            s.target,
            flagged.len(),
            s.signals.len()
        );
        for signal in flagged {
            let _ = writeln!(out, "    {} score {:.2}", signal.date, signal.score);
        }
    }
    out
}

fn render_model_comparison(comparison: &ModelComparisonResponse) -> String {
    let mut out = format!("  {} {} backtest\n", comparison.city, comparison.target);
    let _ = writeln!(
        out,
        "  {:<8} {:>7} {:>12} {:>8} {:>12} {:>7}",
        "model", "horizon", "mae", "mape", "rmse", "r2"
    );
    for (model, metrics) in comparison.models.iter() {
        for metric in metrics {
            let r2 = metric
                .r2
                .map(|r2| format!("{:.3}", r2))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "  {:<8} {:>7} {:>12.2} {:>8.2} {:>12.2} {:>7}",
                model,
                horizon_label(metric.horizon),
                metric.mae,
                metric.mape,
                metric.rmse,
                r2
            );
        }
    }
    for horizon in &comparison.horizons {
        if let Some((model, metric)) = comparison.best_at(*horizon) {
            let _ = writeln!(
                out,
                "  best at {}: {} (MAPE {:.2})",
                horizon_label(*horizon),
                model,
                metric.mape
            );
        }
    }
    out
}
