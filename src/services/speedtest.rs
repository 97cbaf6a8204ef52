use super::Endpoints;
use rand::RngCore;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const PING_COUNT: usize = 5;
pub const DOWNLOAD_CHUNKS: usize = 6;
pub const DOWNLOAD_BYTES: usize = 2_621_440;
pub const UPLOAD_CHUNKS: usize = 4;
pub const UPLOAD_BYTES: usize = 2_097_152;
const CHUNK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedReport {
    pub ping_ms: u64,
    pub signal: &'static str,
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub elapsed: Duration,
}

impl SpeedReport {
    /// `mm:ss` of the whole run.
    pub fn elapsed_clock(&self) -> String {
        let s = self.elapsed.as_secs();
        format!("{:02}:{:02}", s / 60, s % 60)
    }
}

/// Jitter is the population standard deviation of the ping samples.
pub fn jitter(pings: &[f64]) -> Option<f64> {
    if pings.len() < 2 {
        return None;
    }
    let avg = average(pings);
    let var = pings.iter().map(|p| (p - avg).powi(2)).sum::<f64>() / pings.len() as f64;
    Some(var.sqrt())
}

pub fn signal_strength(pings: &[f64]) -> &'static str {
    match jitter(pings) {
        None => "N/A",
        Some(j) if j < 5.0 => "Excellent",
        Some(j) if j < 10.0 => "Very Good",
        Some(j) if j < 20.0 => "Good",
        Some(j) if j < 40.0 => "Fair",
        Some(_) => "Poor",
    }
}

/// Zero for an empty sample.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn mbps(bytes: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    (bytes as f64 * 8.0) / secs / 1e6
}

pub fn random_payload(size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut data);
    data
}

async fn ping(client: &Client, url: &str) -> f64 {
    let started = Instant::now();
    // A failed probe still counts; the elapsed time is the sample.
    let _ = client.get(url).timeout(CHUNK_TIMEOUT).send().await;
    started.elapsed().as_secs_f64() * 1000.0
}

async fn download_chunk(client: &Client, url: &str) -> anyhow::Result<f64> {
    let started = Instant::now();
    let body = client
        .get(url)
        .timeout(CHUNK_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(mbps(body.len(), started.elapsed()))
}

async fn upload_chunk(client: &Client, url: &str) -> anyhow::Result<f64> {
    let payload = random_payload(UPLOAD_BYTES);
    let started = Instant::now();
    client
        .post(url)
        .timeout(CHUNK_TIMEOUT)
        .body(payload)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(mbps(UPLOAD_BYTES, started.elapsed()))
}

/// Pings, then downloads, then uploads. Failed chunks are skipped.
pub async fn run(client: &Client, endpoints: &Endpoints) -> SpeedReport {
    let started = Instant::now();

    let mut pings = Vec::with_capacity(PING_COUNT);
    for _ in 0..PING_COUNT {
        pings.push(ping(client, &endpoints.trace).await.round());
    }

    let down_url = format!("{}/__down?bytes={}", endpoints.speed, DOWNLOAD_BYTES);
    let mut downloads = Vec::new();
    for i in 0..DOWNLOAD_CHUNKS {
        match download_chunk(client, &down_url).await {
            Ok(speed) => downloads.push(speed),
            Err(e) => debug!(chunk = i, "Download chunk skipped: {}", e),
        }
    }

    let up_url = format!("{}/__up", endpoints.speed);
    let mut uploads = Vec::new();
    for i in 0..UPLOAD_CHUNKS {
        match upload_chunk(client, &up_url).await {
            Ok(speed) => uploads.push(speed),
            Err(e) => debug!(chunk = i, "Upload chunk skipped: {}", e),
        }
    }

    let report = SpeedReport {
        ping_ms: average(&pings).round() as u64,
        signal: signal_strength(&pings),
        download_mbps: average(&downloads),
        upload_mbps: average(&uploads),
        elapsed: started.elapsed(),
    };
    info!(
        down = report.download_mbps,
        up = report.upload_mbps,
        ping = report.ping_ms,
        "Speed test finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_in_megabits() {
        let speed = mbps(DOWNLOAD_BYTES, Duration::from_secs(1));
        assert!((speed - 20.97152).abs() < 1e-9);
        assert_eq!(mbps(10, Duration::ZERO), 0.0);
    }
}
