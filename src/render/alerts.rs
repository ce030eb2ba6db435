//! Alert message bodies, one renderer per category.

use crate::weather::ForecastHour;
use crate::weather::SevereAlert;

/// Longest advisory description carried into a message.
const MAX_DESCRIPTION_CHARS: usize = 200;

pub fn rain_alert(name: &str, hour: &ForecastHour) -> String {
    format!(
        "☔ {}, rain is expected soon!\n🕐 Around: {}\n💧 Chance: {}%\nDon't forget an umbrella! ☂️",
        name,
        hour.time.format("%H:%M"),
        hour.rain_chance_pct,
    )
}

pub fn uv_alert(name: &str, uv: u32) -> String {
    format!(
        "☀️ {name}, the UV index is high today ({uv})!\n🧴 Use SPF 30+ sunscreen and sunglasses."
    )
}

pub fn air_quality_alert(aqi: u32) -> String {
    format!(
        "🔴 Poor air quality warning.\nAQI: {aqi}\nConsider a mask or limiting time outside."
    )
}

pub fn severe_alert(alert: &SevereAlert) -> String {
    let description: String = alert.description.chars().take(MAX_DESCRIPTION_CHARS).collect();
    let ellipsis = if alert.description.chars().count() > MAX_DESCRIPTION_CHARS {
        "…"
    } else {
        ""
    };
    format!(
        "⚠️ SEVERE WEATHER WARNING: {}\n\n{}{}",
        alert.event_name, description, ellipsis,
    )
}
