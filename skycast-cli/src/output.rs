use skycast_core::{Screen, Status, Surface, WeatherPanel};

/// Draws screens to stdout, one block per state change.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    /// Print the recent-search list under every screen.
    pub show_recent: bool,
}

impl TerminalSurface {
    pub fn new(show_recent: bool) -> Self {
        Self { show_recent }
    }
}

impl Surface for TerminalSurface {
    fn present(&mut self, screen: &Screen) {
        let text = render(screen, self.show_recent);
        if !text.is_empty() {
            println!("{text}");
        }
    }
}

pub fn render(screen: &Screen, show_recent: bool) -> String {
    let mut out = match &screen.status {
        Status::Idle => String::new(),
        Status::Loading => "Loading...".to_string(),
        Status::Error(message) => format!("Error: {message}"),
        Status::Loaded(panel) => render_panel(panel, screen),
    };

    if show_recent && !screen.recent.is_empty() && !screen.is_loading() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&render_recent(&screen.recent));
    }

    out
}

fn render_panel(panel: &WeatherPanel, screen: &Screen) -> String {
    let mut lines = vec![
        String::new(),
        format!("{}  ({})", panel.location, panel.description),
        panel.observed_at.clone(),
        String::new(),
        format!(
            "  {}  feels like {}  [{}]",
            panel.temperature,
            panel.feels_like,
            screen.unit.symbol()
        ),
        format!("  Humidity    {}", panel.humidity),
        format!("  Wind        {}", panel.wind_speed),
        format!("  Pressure    {}", panel.pressure),
        format!("  Visibility  {}", panel.visibility),
        format!("  Sunrise     {}", panel.sunrise),
        format!("  Sunset      {}", panel.sunset),
        format!("  Icon        {}", panel.icon_url),
    ];

    if !panel.forecast.is_empty() {
        lines.push(String::new());
        lines.push("  5-day forecast".to_string());
        for card in &panel.forecast {
            lines.push(format!(
                "    {:<4}{:>5}  {}",
                card.day, card.temperature, card.description
            ));
        }
    }

    lines.join("\n")
}

fn render_recent(recent: &[String]) -> String {
    let mut out = String::from("Recent searches:");
    for (i, city) in recent.iter().enumerate() {
        out.push_str(&format!("\n  {}. {city}", i + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::{DisplayUnit, ForecastCard};

    fn panel() -> WeatherPanel {
        WeatherPanel {
            location: "Paris, FR".into(),
            description: "light rain".into(),
            observed_at: "Saturday, October 18, 2025 at 04:00 PM".into(),
            temperature: "18°".into(),
            feels_like: "18°".into(),
            humidity: "72%".into(),
            wind_speed: "4.1 m/s".into(),
            pressure: "1012 hPa".into(),
            visibility: "10.0 km".into(),
            sunrise: "08:00 AM".into(),
            sunset: "07:00 PM".into(),
            icon_url: "https://openweathermap.org/img/wn/10d@2x.png".into(),
            icon_alt: "light rain".into(),
            forecast: vec![ForecastCard {
                day: "Sun".into(),
                icon_url: "https://openweathermap.org/img/wn/04d.png".into(),
                description: "overcast clouds".into(),
                temperature: "14°".into(),
            }],
        }
    }

    #[test]
    fn loaded_screen_lists_every_region() {
        let screen = Screen {
            status: Status::Loaded(Box::new(panel())),
            unit: DisplayUnit::Celsius,
            recent: vec!["Paris".into()],
        };

        let text = render(&screen, true);

        assert!(text.contains("Paris, FR  (light rain)"));
        assert!(text.contains("18°  feels like 18°  [°C]"));
        assert!(text.contains("Visibility  10.0 km"));
        assert!(text.contains("Sun   14°  overcast clouds"));
        assert!(text.contains("Recent searches:\n  1. Paris"));
    }

    #[test]
    fn error_and_idle_screens() {
        let error = Screen {
            status: Status::Error("City not found. Please try again.".into()),
            unit: DisplayUnit::Celsius,
            recent: Vec::new(),
        };
        assert_eq!(render(&error, true), "Error: City not found. Please try again.");

        let idle = Screen { status: Status::Idle, unit: DisplayUnit::Celsius, recent: Vec::new() };
        assert_eq!(render(&idle, true), "");
    }

    #[test]
    fn recent_list_hidden_while_loading() {
        let loading = Screen {
            status: Status::Loading,
            unit: DisplayUnit::Fahrenheit,
            recent: vec!["Oslo".into()],
        };
        assert_eq!(render(&loading, true), "Loading...");
    }
}
