//! Message rendering: greetings, condition emoji, digest and alert bodies.

pub mod alerts;
pub mod clothing;
pub mod digest;

use crate::streak::StreakAdvance;
use crate::weather::ConditionKind;

/// Greeting keyed by the subscriber's local hour-of-day band.
pub fn greeting(name: &str, hour: u32) -> String {
    match hour {
        6..=10 => format!("Good morning, {name}! ☀️"),
        11..=16 => format!("Good afternoon, {name}! 😊"),
        17..=22 => format!("Good evening, {name}! 🌆"),
        _ => format!("Good night, {name}! 🌙"),
    }
}

pub fn condition_emoji(condition: ConditionKind) -> &'static str {
    match condition {
        ConditionKind::Thunderstorm => "⛈️",
        ConditionKind::Drizzle => "🌦️",
        ConditionKind::Rain => "🌧️",
        ConditionKind::Snow => "❄️",
        ConditionKind::Fog => "🌫️",
        ConditionKind::Clear => "☀️",
        ConditionKind::Clouds => "☁️",
    }
}

/// Motivational line for a freshly advanced streak.
pub fn streak_message(advance: &StreakAdvance) -> String {
    let streak = advance.current;
    if advance.is_new_record && streak > 1 {
        return format!("🎉 NEW RECORD! {streak} days in a row! 🏆");
    }

    if streak == 1 {
        "🔥 Streak started! Check in every day to keep it growing.".to_string()
    } else if streak < 7 {
        format!("🔥 Streak: {streak} days! Keep it up! 💪")
    } else if streak < 30 {
        format!("🔥🔥 Great streak: {streak} days! 🌟")
    } else {
        format!("🔥🔥🔥 Incredible! {streak} days in a row! 👑")
    }
}
