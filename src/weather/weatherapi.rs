//! WeatherAPI (api.weatherapi.com) gateway implementation.

use std::num::NonZeroU32;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use governor::Quota;
use governor::RateLimiter;
use governor::clock::QuantaClock;
use governor::state::InMemoryState;
use governor::state::direct::NotKeyed;
use log::debug;
use log::info;
use log::warn;
use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use serde_json::Value;

use super::AirQuality;
use super::ConditionKind;
use super::CurrentConditions;
use super::Forecast;
use super::ForecastHour;
use super::SevereAlert;
use super::WeatherGateway;
use super::error::WeatherError;

const HOUR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct WeatherApiGateway {
    pub api_url: String,
    api_key: String,
    client: Client,
    limiter: RateLimiter<NotKeyed, InMemoryState, QuantaClock>,
}

impl WeatherApiGateway {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("meteo-bot/0.3"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create client");

        // Free-tier WeatherAPI keys allow bursts well above this; a small
        // steady rate keeps a large subscriber fan-out from tripping 429s.
        let limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::new(5).unwrap()));

        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            client,
            limiter,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, WeatherError> {
        if self.limiter.check().is_err() {
            info!("Weather API is ratelimited. Waiting...");
        }
        self.limiter.until_ready().await;

        let req = request.build().map_err(WeatherError::from)?;
        debug!("Making request to: {}", req.url());
        Ok(self.client.execute(req).await?)
    }

    /// Fetches `forecast.json` for a query target. A non-success status is
    /// "data unavailable", not an error; the evaluators skip the occurrence.
    async fn fetch_forecast_json(
        &self,
        query: &str,
        aqi: bool,
        alerts: bool,
    ) -> Result<Option<Value>, WeatherError> {
        let request = self
            .client
            .get(format!("{}/forecast.json", self.api_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("days", "1"),
                ("aqi", if aqi { "yes" } else { "no" }),
                ("alerts", if alerts { "yes" } else { "no" }),
            ]);

        let response = self.send(request).await?;
        if !response.status().is_success() {
            warn!(
                "Weather API returned status {} for query `{}`.",
                response.status(),
                query
            );
            return Ok(None);
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body)?;
        Ok(Some(json))
    }

    fn parse_hour(hour: &Value) -> Result<ForecastHour, WeatherError> {
        let time_str = hour["time"]
            .as_str()
            .ok_or_else(|| WeatherError::MissingField {
                field: "hour.time".to_string(),
            })?;
        let time = NaiveDateTime::parse_from_str(time_str, HOUR_TIME_FORMAT).map_err(|_| {
            WeatherError::InvalidTime {
                time: time_str.to_string(),
            }
        })?;

        let code = hour["condition"]["code"].as_i64().unwrap_or(1000);

        Ok(ForecastHour {
            time,
            temp_c: hour["temp_c"]
                .as_f64()
                .ok_or_else(|| WeatherError::MissingField {
                    field: "hour.temp_c".to_string(),
                })?,
            feels_like_c: hour["feelslike_c"].as_f64().unwrap_or_default(),
            humidity_pct: hour["humidity"].as_i64().unwrap_or_default(),
            condition: ConditionKind::from_weatherapi_code(code),
            condition_text: hour["condition"]["text"].as_str().unwrap_or("").to_string(),
            wind_speed_ms: hour["wind_kph"].as_f64().unwrap_or_default() / 3.6,
            rain_chance_pct: hour["chance_of_rain"].as_i64().unwrap_or_default(),
            will_rain: hour["will_it_rain"].as_i64().unwrap_or_default() == 1,
        })
    }

    fn parse_current(current: &Value) -> CurrentConditions {
        let code = current["condition"]["code"].as_i64().unwrap_or(1000);
        CurrentConditions {
            temp_c: current["temp_c"].as_f64().unwrap_or_default(),
            feels_like_c: current["feelslike_c"].as_f64().unwrap_or_default(),
            humidity_pct: current["humidity"].as_i64().unwrap_or_default(),
            condition: ConditionKind::from_weatherapi_code(code),
            condition_text: current["condition"]["text"]
                .as_str()
                .unwrap_or("")
                .to_string(),
            wind_speed_ms: current["wind_kph"].as_f64().unwrap_or_default() / 3.6,
        }
    }
}

#[async_trait]
impl WeatherGateway for WeatherApiGateway {
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Option<Forecast>, WeatherError> {
        let query = format!("{lat},{lon}");
        let Some(json) = self.fetch_forecast_json(&query, false, false).await? else {
            return Ok(None);
        };

        let Some(hours) = json["forecast"]["forecastday"][0]["hour"].as_array() else {
            warn!("No forecast hours in response for `{query}`.");
            return Ok(None);
        };

        let mut hourly = Vec::with_capacity(hours.len());
        for hour in hours {
            hourly.push(Self::parse_hour(hour)?);
        }

        Ok(Some(Forecast { hourly }))
    }

    async fn current(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Option<CurrentConditions>, WeatherError> {
        let query = format!("{lat},{lon}");
        let Some(json) = self.fetch_forecast_json(&query, false, false).await? else {
            return Ok(None);
        };

        if json["current"].is_object() {
            Ok(Some(Self::parse_current(&json["current"])))
        } else {
            Ok(None)
        }
    }

    async fn uv_index(&self, location: &str) -> Result<Option<u32>, WeatherError> {
        let Some(json) = self.fetch_forecast_json(location, false, false).await? else {
            return Ok(None);
        };

        Ok(json["current"]["uv"].as_f64().map(|uv| uv.round() as u32))
    }

    async fn air_quality(&self, location: &str) -> Result<Option<AirQuality>, WeatherError> {
        let Some(json) = self.fetch_forecast_json(location, true, false).await? else {
            return Ok(None);
        };

        Ok(json["current"]["air_quality"]["pm2_5"]
            .as_f64()
            .map(|pm2_5| AirQuality { pm2_5 }))
    }

    async fn severe_alerts(&self, location: &str) -> Result<Vec<SevereAlert>, WeatherError> {
        let Some(json) = self.fetch_forecast_json(location, false, true).await? else {
            return Ok(vec![]);
        };

        let Some(raw) = json["alerts"]["alert"].as_array() else {
            return Ok(vec![]);
        };

        let alerts = raw
            .iter()
            .map(|alert| SevereAlert {
                event_name: alert["event"]
                    .as_str()
                    .or_else(|| alert["headline"].as_str())
                    .unwrap_or("Severe weather")
                    .to_string(),
                description: alert["desc"].as_str().unwrap_or("").to_string(),
            })
            .collect();

        Ok(alerts)
    }
}
