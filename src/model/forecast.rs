use serde::{Deserialize, Serialize};

/// Compact daily forecast used by the report and the advice prompt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub summary: String,
    pub max_temp_c: Option<f64>,
    /// Probability of precipitation in 0..=1.
    pub precip_probability: Option<f64>,
    pub wind_kph: Option<f64>,
}

// Google Weather `forecast/days:lookup` wire types. Every field is optional;
// the API omits blocks freely.

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDaysResponse {
    #[serde(default)]
    pub forecast_days: Vec<ForecastDay>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub daytime_forecast: Option<ForecastPart>,
    pub nighttime_forecast: Option<ForecastPart>,
    pub max_temperature: Option<Temperature>,
    pub feels_like_max_temperature: Option<Temperature>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPart {
    pub weather_condition: Option<WeatherCondition>,
    pub precipitation: Option<Precipitation>,
    pub wind: Option<Wind>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub description: Option<LocalizedDescription>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocalizedDescription {
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Temperature {
    pub degrees: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Precipitation {
    pub probability: Option<Probability>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Probability {
    pub percent: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Wind {
    pub speed: Option<WindValue>,
    pub gust: Option<WindValue>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WindValue {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

impl WindValue {
    fn kph(&self) -> Option<f64> {
        let v = self.value?;
        match self.unit.as_deref().map(str::to_uppercase).as_deref() {
            Some("MILES_PER_HOUR") | Some("MPH") => Some(v * 1.60934),
            _ => Some(v),
        }
    }
}

impl ForecastPart {
    fn summary(&self) -> Option<String> {
        self.weather_condition.as_ref()?.description.as_ref()?.text.clone()
    }

    fn precip_percent(&self) -> Option<f64> {
        self.precipitation.as_ref()?.probability.as_ref()?.percent
    }

    /// Gust when reported, else sustained speed.
    fn wind_kph(&self) -> Option<f64> {
        let wind = self.wind.as_ref()?;
        wind.gust
            .as_ref()
            .and_then(WindValue::kph)
            .or_else(|| wind.speed.as_ref().and_then(WindValue::kph))
    }
}

impl ForecastDay {
    /// Collapse the day into a [`DailyForecast`], preferring daytime values.
    pub fn to_daily(&self) -> DailyForecast {
        let parts = [self.daytime_forecast.as_ref(), self.nighttime_forecast.as_ref()];
        let summary = parts
            .iter()
            .flatten()
            .find_map(|p| p.summary())
            .unwrap_or_else(|| "Unavailable".to_string());
        let precip_probability = parts
            .iter()
            .flatten()
            .find_map(|p| p.precip_percent())
            .map(|p| (p / 100.0).clamp(0.0, 1.0));
        let wind_kph = parts.iter().flatten().find_map(|p| p.wind_kph());
        let max_temp_c = self
            .max_temperature
            .as_ref()
            .and_then(|t| t.degrees)
            .or_else(|| self.feels_like_max_temperature.as_ref().and_then(|t| t.degrees));

        DailyForecast { summary, max_temp_c, precip_probability, wind_kph }
    }
}
