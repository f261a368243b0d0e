use anyhow::bail;
use clap::{Parser, Subcommand};
use skycast_core::{
    Config, Coordinates, DisplayUnit, FileStore, FixedLocation, GeolocationMode, Geolocator,
    IpGeolocator, NoGeolocation, OpenWeatherProvider, PersistedState, RecentSearches, StateStore,
    Widget, WidgetSettings, provider_from_config,
};

use crate::{interactive, output::TerminalSurface};

pub type TerminalWidget = Widget<OpenWeatherProvider, FileStore, TerminalSurface>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and a 5-day forecast")]
pub struct Cli {
    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the OpenWeather API key and display preferences.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name; the last city looked up when absent.
        city: Option<String>,

        /// Display temperatures in Fahrenheit.
        #[arg(short, long)]
        fahrenheit: bool,
    },

    /// Show weather for the current location.
    Here {
        /// Latitude; IP-based lookup is used when coordinates are absent.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Display temperatures in Fahrenheit.
        #[arg(short, long)]
        fahrenheit: bool,
    },

    /// List recent searches, newest first.
    Recent,

    /// Search, switch units and revisit recent cities from a menu.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => interactive::configure()?,
            Command::Show { city, fahrenheit } => {
                let config = Config::load()?;
                let mut widget = build_widget(&config, fahrenheit, false)?;

                let Some(city) = city.or_else(|| widget.last_city().map(str::to_owned)) else {
                    bail!("No city given and no previous search.\nUsage: skycast show <CITY>");
                };
                widget.search_city(&city).await;
            }
            Command::Here { lat, lon, fahrenheit } => {
                let config = Config::load()?;
                let mut widget = build_widget(&config, fahrenheit, false)?;

                let locator: Box<dyn Geolocator> = match (lat, lon) {
                    (Some(lat), Some(lon)) => Box::new(FixedLocation(Coordinates::new(lat, lon))),
                    _ => geolocator_from_config(&config)?,
                };
                widget.search_here(locator.as_ref()).await;
            }
            Command::Recent => {
                let recent = load_recent(&FileStore::open_default()?);
                println!("{}", list_recent(&recent));
            }
            Command::Interactive => {
                let config = Config::load()?;
                interactive::run(&config).await?;
            }
        }

        Ok(())
    }
}

/// Widget wired to OpenWeather, the on-disk state file and the terminal.
pub fn build_widget(
    config: &Config,
    fahrenheit: bool,
    show_recent: bool,
) -> anyhow::Result<TerminalWidget> {
    let provider = provider_from_config(config)?;
    let store = FileStore::open_default()?;

    let mut settings = WidgetSettings::from(config);
    if fahrenheit {
        settings.unit = DisplayUnit::Fahrenheit;
    }

    Ok(Widget::new(provider, store, TerminalSurface::new(show_recent), settings))
}

/// Recent searches as the widget would see them; an unreadable state file
/// reads as empty.
fn load_recent(store: &impl StateStore) -> RecentSearches {
    let persisted = store.load().unwrap_or_else(|err| {
        tracing::warn!("ignoring unreadable saved state: {err:#}");
        PersistedState::default()
    });
    RecentSearches::from_persisted(persisted.recent_searches)
}

fn list_recent(recent: &RecentSearches) -> String {
    if recent.is_empty() {
        return "No recent searches.".to_string();
    }
    recent
        .list()
        .iter()
        .enumerate()
        .map(|(i, city)| format!("{}. {city}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn geolocator_from_config(config: &Config) -> anyhow::Result<Box<dyn Geolocator>> {
    let locator: Box<dyn Geolocator> = match config.geolocation {
        GeolocationMode::Ip => Box::new(IpGeolocator::with_url(
            &config.geolocation_url,
            config.timeout_secs,
        )?),
        GeolocationMode::Disabled => Box::new(NoGeolocation),
    };
    Ok(locator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use skycast_core::MemoryStore;
    use std::fs;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["skycast"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn show_accepts_city_and_unit_flag() {
        let cli = Cli::try_parse_from(["skycast", "show", "New York", "-f"]).unwrap();
        match cli.command {
            Some(Command::Show { city, fahrenheit }) => {
                assert_eq!(city.as_deref(), Some("New York"));
                assert!(fahrenheit);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn here_accepts_negative_coordinates() {
        let cli =
            Cli::try_parse_from(["skycast", "here", "--lat", "-33.9", "--lon", "18.4"]).unwrap();
        match cli.command {
            Some(Command::Here { lat, lon, .. }) => {
                assert_eq!(lat, Some(-33.9));
                assert_eq!(lon, Some(18.4));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn here_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["skycast", "here", "--lat", "10"]).is_err());
    }

    #[test]
    fn disabled_geolocation_builds_without_network() {
        let config = Config { geolocation: GeolocationMode::Disabled, ..Config::default() };
        assert!(geolocator_from_config(&config).is_ok());
    }

    #[test]
    fn recent_listing_is_normalised() {
        let store = MemoryStore::new(PersistedState {
            last_city: None,
            recent_searches: ["Oslo", "Rome", "Oslo", "", "Lima", "Kyiv", "Doha", "Baku"]
                .map(String::from)
                .to_vec(),
        });

        let recent = load_recent(&store);

        assert_eq!(
            list_recent(&recent),
            "1. Oslo\n2. Rome\n3. Lima\n4. Kyiv\n5. Doha"
        );
    }

    #[test]
    fn corrupt_state_file_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let recent = load_recent(&FileStore::new(&path));

        assert!(recent.is_empty());
        assert_eq!(list_recent(&recent), "No recent searches.");
    }
}
