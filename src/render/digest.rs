//! Daily digest body rendering.

use chrono::NaiveDateTime;
use chrono::Timelike;

use super::clothing;
use super::condition_emoji;
use super::streak_message;
use crate::database::model::Sensitivity;
use crate::streak::StreakAdvance;
use crate::weather::Forecast;
use crate::weather::ForecastHour;

/// Forecast period shown in the digest: label and local hour.
const PERIODS: [(&str, u32); 3] = [("🌅 Morning", 9), ("☀️ Day", 15), ("🌇 Evening", 21)];

/// Local hour whose entry drives the clothing recommendation; falls back to
/// the current hour when the day is already past it.
const CLOTHING_HOUR: u32 = 15;

/// Renders the digest body. The caller prepends the greeting line and is
/// responsible for skipping empty forecasts.
pub fn body(
    city_name: &str,
    name: &str,
    sensitivity: Sensitivity,
    local_now: NaiveDateTime,
    forecast: &Forecast,
    uv: Option<u32>,
    aqi: Option<u32>,
    streak: Option<&StreakAdvance>,
) -> String {
    let Some(current) = forecast.hour_at(local_now).or(forecast.hourly.first()) else {
        return "❌ Could not fetch the forecast.".to_string();
    };

    let mut text = format!(
        "{} Weather in {}\n\n🌡️ Now: {:+.0}°C (feels like {:+.0}°C)\n💨 Wind: {:.1} km/h\n💧 Humidity: {}%\n",
        condition_emoji(current.condition),
        city_name,
        current.temp_c,
        current.feels_like_c,
        current.wind_speed_ms * 3.6,
        current.humidity_pct,
    );

    let periods = period_lines(forecast);
    if !periods.is_empty() {
        text.push_str("\n📅 Today's forecast:\n");
        text.push_str(&periods);
    }

    if let Some(uv) = uv {
        text.push_str(&format!("\n☀️ UV index: {uv}"));
    }
    if let Some(aqi) = aqi {
        text.push_str(&format!("\n🌫️ Air quality: AQI {aqi}"));
    }
    if uv.is_some() || aqi.is_some() {
        text.push('\n');
    }

    // The afternoon entry is the better basis for what to wear all day.
    let key_hour = hour_with(forecast, CLOTHING_HOUR).unwrap_or(current);
    text.push_str(&format!(
        "\n👔 What to wear:\n{}",
        clothing::advice(
            key_hour.temp_c,
            key_hour.condition,
            key_hour.wind_speed_ms,
            sensitivity,
            name,
        )
    ));

    if let Some(advance) = streak {
        text.push_str(&format!("\n\n{}", streak_message(advance)));
    }

    text
}

fn period_lines(forecast: &Forecast) -> String {
    let mut lines = String::new();
    for (label, hour) in PERIODS {
        if let Some(entry) = hour_with(forecast, hour) {
            lines.push_str(&format!(
                "{} ({:02}:00): {:+.0}°C {}\n",
                label,
                hour,
                entry.temp_c,
                condition_emoji(entry.condition),
            ));
        }
    }
    lines
}

fn hour_with(forecast: &Forecast, hour: u32) -> Option<&ForecastHour> {
    forecast
        .hourly
        .iter()
        .find(|h| h.time.hour() == hour && h.time.minute() == 0)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::weather::ConditionKind;

    fn hour(h: u32, temp: f64, condition: ConditionKind) -> ForecastHour {
        ForecastHour {
            time: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            temp_c: temp,
            feels_like_c: temp - 1.0,
            humidity_pct: 55,
            condition,
            condition_text: "test".to_string(),
            wind_speed_ms: 3.0,
            rain_chance_pct: 0,
            will_rain: false,
        }
    }

    fn full_day() -> Forecast {
        Forecast {
            hourly: (0..24)
                .map(|h| hour(h, 10.0 + h as f64, ConditionKind::Clear))
                .collect(),
        }
    }

    #[test]
    fn test_body_contains_sections() {
        let local_now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let text = body(
            "Novosibirsk",
            "Ann",
            Sensitivity::Normal,
            local_now,
            &full_day(),
            Some(4),
            Some(37),
            None,
        );

        assert!(text.contains("Weather in Novosibirsk"));
        assert!(text.contains("🌅 Morning (09:00)"));
        assert!(text.contains("☀️ Day (15:00)"));
        assert!(text.contains("🌇 Evening (21:00)"));
        assert!(text.contains("UV index: 4"));
        assert!(text.contains("AQI 37"));
        assert!(text.contains("What to wear"));
    }

    #[test]
    fn test_clothing_keyed_by_afternoon() {
        let local_now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        // Afternoon is 25°C while the morning is 10°C; the advice should
        // follow the afternoon.
        let text = body(
            "Novosibirsk",
            "Ann",
            Sensitivity::Normal,
            local_now,
            &full_day(),
            None,
            None,
            None,
        );
        assert!(text.contains("Hot!"));
    }

    #[test]
    fn test_streak_line_appended() {
        let advance = StreakAdvance {
            current: 4,
            best: 9,
            is_new_record: false,
            changed: true,
        };
        let local_now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let text = body(
            "Novosibirsk",
            "Ann",
            Sensitivity::Normal,
            local_now,
            &full_day(),
            None,
            None,
            Some(&advance),
        );
        assert!(text.contains("Streak: 4 days"));
    }
}
