//! AQI estimation from PM2.5 concentration.
//!
//! Standard piecewise-linear breakpoint interpolation. Concentrations above
//! the last breakpoint clamp into the 201+ band rather than extrapolating.

struct Breakpoint {
    conc_low: f64,
    conc_high: f64,
    aqi_low: u32,
    aqi_high: u32,
}

const BREAKPOINTS: [Breakpoint; 4] = [
    Breakpoint { conc_low: 0.0, conc_high: 12.0, aqi_low: 0, aqi_high: 50 },
    Breakpoint { conc_low: 12.1, conc_high: 35.4, aqi_low: 51, aqi_high: 100 },
    Breakpoint { conc_low: 35.5, conc_high: 55.4, aqi_low: 101, aqi_high: 150 },
    Breakpoint { conc_low: 55.5, conc_high: 150.4, aqi_low: 151, aqi_high: 200 },
];

/// Estimates the AQI for a PM2.5 concentration in µg/m³.
pub fn pm25_to_aqi(pm2_5: f64) -> u32 {
    let conc = pm2_5.max(0.0);

    for bp in &BREAKPOINTS {
        if conc <= bp.conc_high {
            let fraction = (conc - bp.conc_low) / (bp.conc_high - bp.conc_low);
            let span = f64::from(bp.aqi_high - bp.aqi_low);
            return bp.aqi_low + (fraction.clamp(0.0, 1.0) * span).round() as u32;
        }
    }

    201
}
