use super::Endpoints;
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoPlace>,
}

#[derive(Deserialize)]
struct GeoPlace {
    latitude: f64,
    longitude: f64,
    name: String,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
}

fn is_fahrenheit(unit: &str) -> bool {
    unit.trim().eq_ignore_ascii_case("fahrenheit")
}

pub fn format_reading(name: &str, temperature: f64, unit: &str) -> String {
    let symbol = if is_fahrenheit(unit) { "°F" } else { "°C" };
    format!("{} {}{}", name, temperature.round() as i64, symbol)
}

async fn fetch(client: &Client, endpoints: &Endpoints, location: &str, unit: &str) -> Result<Option<String>> {
    let geo_url = format!(
        "{}?name={}&count=1&language=en&format=json",
        endpoints.geocoding,
        urlencoding::encode(location)
    );
    let geo: GeoResponse = client.get(geo_url).timeout(TIMEOUT).send().await?.json().await?;
    let Some(place) = geo.results.into_iter().next() else {
        return Ok(None);
    };

    let mut forecast_url = format!(
        "{}?latitude={}&longitude={}&current_weather=true",
        endpoints.forecast, place.latitude, place.longitude
    );
    if is_fahrenheit(unit) {
        forecast_url.push_str("&temperature_unit=fahrenheit");
    }
    let forecast: ForecastResponse = client
        .get(forecast_url)
        .timeout(TIMEOUT)
        .send()
        .await?
        .json()
        .await
        .map_err(|e| anyhow!("forecast: {}", e))?;

    Ok(Some(format_reading(&place.name, forecast.current_weather.temperature, unit)))
}

/// Header reading such as `Gurgaon 31°C`; the bare location on any failure.
pub async fn current(client: &Client, endpoints: &Endpoints, location: &str, unit: &str) -> String {
    match fetch(client, endpoints, location, unit).await {
        Ok(Some(reading)) => reading,
        Ok(None) => location.to_string(),
        Err(e) => {
            warn!("Weather fetch failed for '{}': {}", location, e);
            location.to_string()
        }
    }
}
