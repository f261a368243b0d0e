use std::fmt;

use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Select, Text};
use skycast_core::{Config, DisplayUnit, GeolocationMode, UnitToggle};

use crate::cli::{build_widget, geolocator_from_config};

/// One entry of the interactive menu.
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Search,
    Here,
    Switch(DisplayUnit),
    Recent(String),
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search => f.write_str("Search for a city"),
            Action::Here => f.write_str("Use my location"),
            Action::Switch(unit) => write!(f, "Show in {}", unit.symbol()),
            Action::Recent(city) => write!(f, "Recent: {city}"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

fn menu(unit: DisplayUnit, recent: &[String]) -> Vec<Action> {
    let mut actions = vec![Action::Search, Action::Here, Action::Switch(unit.other())];
    actions.extend(recent.iter().cloned().map(Action::Recent));
    actions.push(Action::Quit);
    actions
}

/// Ctrl-C and Esc end the prompt without being errors.
fn cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Widget event loop: restore the last city, then act on menu choices until
/// the user quits.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let mut widget = build_widget(config, false, true)?;
    let locator = geolocator_from_config(config)?;

    widget.restore().await;

    loop {
        let actions = menu(widget.unit(), widget.recent().list());
        let action = match Select::new("What next?", actions).prompt() {
            Ok(action) => action,
            Err(err) if cancelled(&err) => break,
            Err(err) => return Err(err.into()),
        };

        match action {
            Action::Search => {
                let city = match Text::new("City:").with_initial_value(widget.input()).prompt() {
                    Ok(city) => city,
                    Err(err) if cancelled(&err) => continue,
                    Err(err) => return Err(err.into()),
                };
                widget.search_city(&city).await;
            }
            Action::Here => widget.search_here(locator.as_ref()).await,
            Action::Switch(unit) => widget.switch_unit(unit).await,
            Action::Recent(city) => widget.select_recent(&city).await,
            Action::Quit => break,
        }
    }

    Ok(())
}

const TOGGLE_RETAIN: &str = "Convert the loaded data";
const TOGGLE_REQUERY: &str = "Re-run the lookup when switching back to °C";

/// Prompt for credentials and preferences, then write the config file.
pub fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    config.set_api_key(api_key);

    let unit_index = match config.unit {
        DisplayUnit::Celsius => 0,
        DisplayUnit::Fahrenheit => 1,
    };
    config.unit = Select::new(
        "Default unit:",
        vec![DisplayUnit::Celsius, DisplayUnit::Fahrenheit],
    )
    .with_starting_cursor(unit_index)
    .prompt()?;

    let toggle = Select::new("When switching units:", vec![TOGGLE_RETAIN, TOGGLE_REQUERY])
        .with_starting_cursor(match config.unit_toggle {
            UnitToggle::Retain => 0,
            UnitToggle::Requery => 1,
        })
        .prompt()?;
    config.unit_toggle = if toggle == TOGGLE_REQUERY {
        UnitToggle::Requery
    } else {
        UnitToggle::Retain
    };

    let allow_ip = Confirm::new("Look up your location from your IP address?")
        .with_default(config.geolocation == GeolocationMode::Ip)
        .prompt()?;
    config.geolocation = if allow_ip { GeolocationMode::Ip } else { GeolocationMode::Disabled };

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}
