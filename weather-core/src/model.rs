use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions for one city, as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location_name: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub condition: String,
    pub observation_time: Option<DateTime<Utc>>,
}

impl WeatherReport {
    pub fn temperature_f(&self) -> f64 {
        celsius_to_fahrenheit(self.temperature_c)
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}
