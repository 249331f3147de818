//! Load-time based performance estimate.
//!
//! There is no browser here, so every metric is derived from the wall-clock
//! time of one GET of the page.

use crate::models::{LabData, PerformanceMetrics};
use std::time::Instant;

const ASSUMED_CLS: f64 = 0.05;
const DIAGNOSTICS_COUNT: u32 = 3;

/// Times one full GET of `url` (headers and body) and derives the metrics from it.
pub async fn measure(
    client: &reqwest::Client,
    url: &str,
) -> Result<PerformanceMetrics, reqwest::Error> {
    let start = Instant::now();
    let response = client.get(url).send().await?;
    response.bytes().await?;
    let elapsed_ms = start.elapsed().as_millis() as f64;

    tracing::debug!(url = %url, elapsed_ms, "Performance timing finished");
    Ok(from_load_time(elapsed_ms))
}

pub fn from_load_time(load_time_ms: f64) -> PerformanceMetrics {
    let t = load_time_ms.max(0.0);
    let tbt = (t - 300.0).max(0.0);

    PerformanceMetrics {
        lcp: (t > 2500.0).then_some(t),
        cls: Some(ASSUMED_CLS),
        inp: (t > 100.0).then_some(t / 10.0),
        fcp: Some(t * 0.6),
        ttfb: Some(t * 0.2),
        tbt: Some(tbt),
        si: Some(t * 1.2),
        tti: Some(t * 1.5),
        performance_score: (100.0 - (t / 50.0).floor()).max(0.0) as u8,
        opportunities_count: if t > 2000.0 { 5 } else { 2 },
        diagnostics_count: DIAGNOSTICS_COUNT,
        lab_data: LabData {
            first_contentful_paint: t * 0.6,
            largest_contentful_paint: t,
            speed_index: t * 1.2,
            time_to_interactive: t * 1.5,
            total_blocking_time: tbt,
            cumulative_layout_shift: ASSUMED_CLS,
        },
    }
}
