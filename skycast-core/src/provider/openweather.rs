use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    error::{QueryError, TransportError},
    model::{ForecastPoint, LocationQuery, WeatherSnapshot},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Provider rooted at `base_url`, normally [`crate::config::DEFAULT_BASE_URL`].
    pub fn with_base_url(
        api_key: String,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Issues a GET against `endpoint` and returns the body once its `cod`
    /// field reports success.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
    ) -> Result<Result<T, OwFailure>, TransportError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut params = query.query_pairs();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        tracing::debug!(endpoint, location = %query, "requesting OpenWeather");

        let res = self.http.get(&url).query(&params).send().await?;
        let http_status = res.status();
        let body = res.text().await?;

        tracing::debug!(endpoint, status = %http_status, "OpenWeather responded");

        let envelope: OwStatus = serde_json::from_str(&body).map_err(|e| {
            TransportError::Malformed(format!(
                "{endpoint} response is not a status envelope ({e}): {}",
                truncate_body(&body)
            ))
        })?;

        if !envelope.cod.is_success() {
            return Ok(Err(OwFailure {
                code: envelope.cod.to_string(),
                message: envelope.message_text(),
            }));
        }

        let parsed = serde_json::from_str(&body).map_err(|e| {
            TransportError::Malformed(format!("Failed to parse OpenWeather {endpoint} JSON: {e}"))
        })?;

        Ok(Ok(parsed))
    }
}

/// Non-200 `cod` reported by the provider.
#[derive(Debug)]
struct OwFailure {
    code: String,
    message: String,
}

/// `cod` is a number on `/weather` success and a string everywhere else.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn is_success(&self) -> bool {
        match self {
            OwCode::Number(n) => *n == 200,
            OwCode::Text(s) => s.trim() == "200",
        }
    }
}

impl std::fmt::Display for OwCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwCode::Number(n) => write!(f, "{n}"),
            OwCode::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwStatus {
    cod: OwCode,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

impl OwStatus {
    fn message_text(&self) -> String {
        match &self.message {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "no message".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i32,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn first_condition(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

fn timestamp(ts: i64, field: &str) -> Result<DateTime<Utc>, TransportError> {
    unix_to_utc(ts)
        .ok_or_else(|| TransportError::Malformed(format!("{field} timestamp {ts} is out of range")))
}

impl TryFrom<OwCurrentResponse> for WeatherSnapshot {
    type Error = TransportError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let (description, icon_code) = first_condition(&parsed.weather);

        Ok(WeatherSnapshot {
            location_name: parsed.name,
            country_code: parsed.sys.country,
            description,
            icon_code,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_ms: parsed.wind.speed,
            visibility_m: parsed.visibility,
            sunrise: timestamp(parsed.sys.sunrise, "sunrise")?,
            sunset: timestamp(parsed.sys.sunset, "sunset")?,
            observed_at: timestamp(parsed.dt, "observation")?,
            utc_offset_secs: parsed.timezone,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, QueryError> {
        let parsed: OwCurrentResponse = match self.fetch("weather", query).await? {
            Ok(parsed) => parsed,
            Err(OwFailure { code, message }) => {
                tracing::debug!(%code, %message, location = %query, "location not resolved");
                return Err(QueryError::NotFound { code, message });
            }
        };

        Ok(WeatherSnapshot::try_from(parsed)?)
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<Vec<ForecastPoint>, QueryError> {
        let parsed: OwForecastResponse = self
            .fetch("forecast", query)
            .await?
            .map_err(|OwFailure { code, message }| TransportError::Rejected { code, message })?;

        let points = parsed
            .list
            .into_iter()
            .map(|entry| {
                let (description, icon_code) = first_condition(&entry.weather);
                Ok(ForecastPoint {
                    forecast_at: timestamp(entry.dt, "forecast")?,
                    temperature_c: entry.main.temp,
                    description,
                    icon_code,
                })
            })
            .collect::<Result<Vec<_>, TransportError>>()?;

        Ok(points)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cod_accepts_number_and_string() {
        let num: OwStatus = serde_json::from_str(r#"{"cod":200}"#).unwrap();
        let text: OwStatus = serde_json::from_str(r#"{"cod":"200","message":0}"#).unwrap();
        let missing: OwStatus =
            serde_json::from_str(r#"{"cod":"404","message":"city not found"}"#).unwrap();

        assert!(num.cod.is_success());
        assert!(text.cod.is_success());
        assert!(!missing.cod.is_success());
        assert_eq!(missing.cod.to_string(), "404");
        assert_eq!(missing.message_text(), "city not found");
    }

    #[test]
    fn current_response_maps_to_snapshot() {
        let body = r#"{
            "cod": 200, "name": "Paris", "dt": 1760796000, "timezone": 7200,
            "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 72, "pressure": 1012},
            "weather": [{"description": "light rain", "icon": "10d"}],
            "wind": {"speed": 4.1},
            "visibility": 10000,
            "sys": {"country": "FR", "sunrise": 1760767200, "sunset": 1760806800}
        }"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();
        let snapshot = WeatherSnapshot::try_from(parsed).unwrap();

        assert_eq!(snapshot.location_name, "Paris");
        assert_eq!(snapshot.country_code, "FR");
        assert_eq!(snapshot.icon_code, "10d");
        assert_eq!(snapshot.temperature_c, 18.4);
        assert_eq!(snapshot.visibility_m, Some(10000));
        assert_eq!(snapshot.utc_offset_secs, 7200);
        assert_eq!(snapshot.observed_at.timestamp(), 1760796000);
    }

    #[test]
    fn out_of_range_observation_time_is_malformed() {
        let body = r#"{
            "cod": 200, "name": "Paris", "dt": 9223372036854775807, "timezone": 7200,
            "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 72, "pressure": 1012},
            "weather": [{"description": "light rain", "icon": "10d"}],
            "wind": {"speed": 4.1},
            "sys": {"country": "FR", "sunrise": 1760767200, "sunset": 1760806800}
        }"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();
        let err = WeatherSnapshot::try_from(parsed).unwrap_err();

        assert!(matches!(err, TransportError::Malformed(ref m) if m.contains("observation")));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }
}
