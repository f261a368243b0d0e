//! View model for the widget and the seam to whatever draws it.
//!
//! A [`Screen`] is the complete description of what is visible at one moment;
//! a [`Surface`] receives every new screen and is free to draw it however it
//! likes (terminal, test recorder, ...).

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::{
    app::QueryOrigin,
    config::UnitToggle,
    error::{QueryError, TransportError},
    forecast::select_daily,
    model::{DisplayUnit, WeatherReport},
    units::{celsius_to_fahrenheit, round_degrees, to_fahrenheit},
};

/// Which of the four mutually exclusive widget states is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Loading,
    Error(String),
    Loaded(Box<WeatherPanel>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub status: Status,
    pub unit: DisplayUnit,
    pub recent: Vec<String>,
}

impl Screen {
    pub fn panel(&self) -> Option<&WeatherPanel> {
        match &self.status {
            Status::Loaded(panel) => Some(&**panel),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, Status::Loading)
    }
}

/// Rendered text for every region of the loaded weather view.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherPanel {
    pub location: String,
    pub description: String,
    pub observed_at: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub visibility: String,
    pub sunrise: String,
    pub sunset: String,
    pub icon_url: String,
    pub icon_alt: String,
    pub forecast: Vec<ForecastCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub day: String,
    pub icon_url: String,
    pub description: String,
    pub temperature: String,
}

/// Something that can show a [`Screen`].
pub trait Surface {
    fn present(&mut self, screen: &Screen);
}

/// Keeps every screen it is shown. Useful for asserting state transitions.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub screens: Vec<Screen>,
}

impl RecordingSurface {
    pub fn last(&self) -> Option<&Screen> {
        self.screens.last()
    }
}

impl Surface for RecordingSurface {
    fn present(&mut self, screen: &Screen) {
        self.screens.push(screen.clone());
    }
}

/// Formatting knobs shared by every rendered panel.
#[derive(Debug, Clone)]
pub struct PanelStyle {
    pub icon_base_url: String,
    pub unit_toggle: UnitToggle,
}

impl WeatherPanel {
    pub fn build(report: &WeatherReport, unit: DisplayUnit, style: &PanelStyle) -> Self {
        let snap = &report.snapshot;
        let offset = local_offset(snap.utc_offset_secs);
        let icon_base = style.icon_base_url.trim_end_matches('/');
        let temp = |celsius: f64| format_temperature(celsius, unit, style.unit_toggle);

        let forecast = select_daily(&report.forecast, snap.utc_offset_secs)
            .into_iter()
            .map(|point| ForecastCard {
                day: local(point.forecast_at, offset).format("%a").to_string(),
                icon_url: format!("{icon_base}/{}.png", point.icon_code),
                description: point.description,
                temperature: temp(point.temperature_c),
            })
            .collect();

        WeatherPanel {
            location: format!("{}, {}", snap.location_name, snap.country_code),
            description: snap.description.clone(),
            observed_at: local(snap.observed_at, offset)
                .format("%A, %B %-d, %Y at %I:%M %p")
                .to_string(),
            temperature: temp(snap.temperature_c),
            feels_like: temp(snap.feels_like_c),
            humidity: format!("{}%", snap.humidity_pct),
            wind_speed: format!("{} m/s", snap.wind_speed_ms),
            pressure: format!("{} hPa", snap.pressure_hpa),
            visibility: snap
                .visibility_m
                .map(|m| format!("{:.1} km", f64::from(m) / 1000.0))
                .unwrap_or_else(|| "n/a".to_string()),
            sunrise: short_time(snap.sunrise, offset),
            sunset: short_time(snap.sunset, offset),
            icon_url: format!("{icon_base}/{}@2x.png", snap.icon_code),
            icon_alt: snap.description.clone(),
            forecast,
        }
    }
}

/// Whole degrees with a trailing `°`.
///
/// Under [`UnitToggle::Requery`] Fahrenheit is computed from the already
/// rounded Celsius figure, the way the figures on screen would be converted.
pub fn format_temperature(celsius: f64, unit: DisplayUnit, toggle: UnitToggle) -> String {
    let degrees = match (unit, toggle) {
        (DisplayUnit::Celsius, _) => round_degrees(celsius),
        (DisplayUnit::Fahrenheit, UnitToggle::Retain) => {
            round_degrees(celsius_to_fahrenheit(celsius))
        }
        (DisplayUnit::Fahrenheit, UnitToggle::Requery) => to_fahrenheit(round_degrees(celsius)),
    };
    format!("{degrees}°")
}

/// The one-line message shown in the Error state.
pub fn error_message(err: &QueryError, origin: &QueryOrigin) -> String {
    let by_city = matches!(origin, QueryOrigin::City(_));
    let message = match err {
        QueryError::EmptyInput => "Please enter a city name",
        QueryError::NotFound { .. } if by_city => "City not found. Please try again.",
        QueryError::NotFound { .. } => "Unable to get weather for your location.",
        QueryError::Transport(TransportError::Location(_)) => "Unable to retrieve your location.",
        QueryError::Transport(_) if by_city => {
            "Error fetching weather data. Please check your connection."
        }
        QueryError::Transport(_) => "Error fetching weather data.",
        QueryError::GeolocationUnsupported => "Geolocation is not supported on this system.",
    };
    message.to_string()
}

fn local_offset(utc_offset_secs: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_secs).unwrap_or_else(|| Utc.fix())
}

fn local(at: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    at.with_timezone(&offset)
}

fn short_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    local(at, offset).format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dispatch::tests::snapshot,
        geo::LocationError,
        model::ForecastPoint,
    };
    use chrono::TimeZone;

    fn style(toggle: UnitToggle) -> PanelStyle {
        PanelStyle {
            icon_base_url: "https://icons.test/wn/".into(),
            unit_toggle: toggle,
        }
    }

    fn paris_report() -> WeatherReport {
        let mut snap = snapshot("Paris", "FR", 18.4);
        snap.utc_offset_secs = 7200;
        snap.description = "light rain".into();
        snap.icon_code = "10d".into();
        snap.wind_speed_ms = 4.1;
        snap.visibility_m = Some(9_500);
        // 2026-10-18 14:30 local
        snap.observed_at = Utc.with_ymd_and_hms(2026, 10, 18, 12, 30, 0).unwrap();
        snap.sunrise = Utc.with_ymd_and_hms(2026, 10, 18, 6, 2, 0).unwrap();
        snap.sunset = Utc.with_ymd_and_hms(2026, 10, 18, 16, 41, 0).unwrap();

        let forecast = (0..16)
            .map(|i| ForecastPoint {
                forecast_at: Utc.with_ymd_and_hms(2026, 10, 19, 1, 0, 0).unwrap()
                    + chrono::Duration::hours(3 * i),
                temperature_c: 10.0 + i as f64,
                description: "overcast clouds".into(),
                icon_code: "04d".into(),
            })
            .collect();

        WeatherReport { snapshot: snap, forecast }
    }

    #[test]
    fn loaded_panel_formats_every_region() {
        let panel = WeatherPanel::build(
            &paris_report(),
            DisplayUnit::Celsius,
            &style(UnitToggle::Retain),
        );

        assert_eq!(panel.location, "Paris, FR");
        assert_eq!(panel.description, "light rain");
        assert_eq!(panel.observed_at, "Sunday, October 18, 2026 at 02:30 PM");
        assert_eq!(panel.temperature, "18°");
        assert_eq!(panel.feels_like, "18°");
        assert_eq!(panel.humidity, "60%");
        assert_eq!(panel.wind_speed, "4.1 m/s");
        assert_eq!(panel.pressure, "1015 hPa");
        assert_eq!(panel.visibility, "9.5 km");
        assert_eq!(panel.sunrise, "08:02 AM");
        assert_eq!(panel.sunset, "06:41 PM");
        assert_eq!(panel.icon_url, "https://icons.test/wn/10d@2x.png");
        assert_eq!(panel.icon_alt, "light rain");
    }

    #[test]
    fn forecast_cards_use_local_noon_slots() {
        let panel = WeatherPanel::build(
            &paris_report(),
            DisplayUnit::Celsius,
            &style(UnitToggle::Retain),
        );

        // Slots at 01:00 UTC + 3h steps land on 12:00 local (UTC+2) at i = 3 and 11.
        assert_eq!(panel.forecast.len(), 2);
        assert_eq!(panel.forecast[0].day, "Mon");
        assert_eq!(panel.forecast[0].temperature, "13°");
        assert_eq!(panel.forecast[1].day, "Tue");
        assert_eq!(panel.forecast[1].temperature, "21°");
        assert_eq!(panel.forecast[0].icon_url, "https://icons.test/wn/04d.png");
    }

    #[test]
    fn missing_visibility_is_not_applicable() {
        let mut report = paris_report();
        report.snapshot.visibility_m = None;
        let panel = WeatherPanel::build(&report, DisplayUnit::Celsius, &style(UnitToggle::Retain));
        assert_eq!(panel.visibility, "n/a");
    }

    #[test]
    fn fahrenheit_depends_on_toggle_policy() {
        assert_eq!(
            format_temperature(18.4, DisplayUnit::Fahrenheit, UnitToggle::Retain),
            "65°"
        );
        assert_eq!(
            format_temperature(18.4, DisplayUnit::Fahrenheit, UnitToggle::Requery),
            "64°"
        );
        assert_eq!(
            format_temperature(37.5, DisplayUnit::Fahrenheit, UnitToggle::Retain),
            "100°"
        );
        assert_eq!(format_temperature(-0.4, DisplayUnit::Celsius, UnitToggle::Retain), "0°");
    }

    #[test]
    fn error_messages_depend_on_origin() {
        let city = QueryOrigin::City("Atlantis".into());
        let here = QueryOrigin::Coordinates;
        let not_found = || QueryError::NotFound { code: "404".into(), message: "x".into() };
        let malformed = || QueryError::Transport(TransportError::Malformed("x".into()));

        assert_eq!(error_message(&QueryError::EmptyInput, &city), "Please enter a city name");
        assert_eq!(error_message(&not_found(), &city), "City not found. Please try again.");
        assert_eq!(
            error_message(&not_found(), &here),
            "Unable to get weather for your location."
        );
        assert_eq!(
            error_message(&malformed(), &city),
            "Error fetching weather data. Please check your connection."
        );
        assert_eq!(error_message(&malformed(), &here), "Error fetching weather data.");
        assert_eq!(
            error_message(&QueryError::from(LocationError::Timeout), &here),
            "Unable to retrieve your location."
        );
        assert_eq!(
            error_message(&QueryError::GeolocationUnsupported, &here),
            "Geolocation is not supported on this system."
        );
    }
}
