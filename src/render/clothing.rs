//! Clothing advice keyed by effective temperature.

use crate::database::model::Sensitivity;
use crate::weather::ConditionKind;

/// Wind above this calls for a windproof layer, in m/s.
const STRONG_WIND_MS: f64 = 7.0;

/// Builds clothing advice for the given conditions.
///
/// The subscriber's sensitivity shifts the effective temperature before the
/// band is picked, so a cold-sensitive subscriber gets warmer advice for the
/// same forecast.
pub fn advice(
    temp_c: f64,
    condition: ConditionKind,
    wind_speed_ms: f64,
    sensitivity: Sensitivity,
    name: &str,
) -> String {
    let effective = temp_c + sensitivity.offset_c();

    let mut parts = vec![band_advice(effective).to_string()];

    if condition.is_wet() {
        parts.push(
            "\n☔️ Rain or storms expected. Don't forget an umbrella and waterproof shoes!"
                .to_string(),
        );
    } else if condition == ConditionKind::Snow {
        parts.push("\n🌨 Snow is possible. Wear warm, non-slip shoes.".to_string());
    }

    if wind_speed_ms > STRONG_WIND_MS {
        parts.push("\n💨 Strong wind. A windproof jacket is a good idea.".to_string());
    }

    format!("{name}, my advice: {}", parts.join(" "))
}

fn band_advice(effective_temp: f64) -> &'static str {
    if effective_temp < -15.0 {
        "🥶 Freezing! You need a thick down jacket, a warm sweater, a hat, a scarf and mittens."
    } else if effective_temp < -5.0 {
        "❄️ Frosty. Wear a winter coat, a sweater, a hat and gloves."
    } else if effective_temp < 5.0 {
        "🧥 Chilly. A warm jacket and a light sweater will do."
    } else if effective_temp < 15.0 {
        "🌤 Brisk. Wear a mid-season jacket, a hoodie or a raincoat."
    } else if effective_temp < 20.0 {
        "😌 Comfortable. A light jacket, blazer or cardigan."
    } else if effective_temp < 25.0 {
        "😎 Warm. A t-shirt, jeans or a light dress."
    } else {
        "🥵 Hot! Shorts, a tank top, sandals. Dress as light as you can."
    }
}
