use crate::{
    config::{Config, UnitToggle},
    dispatch::QueryDispatcher,
    error::QueryError,
    geo::Geolocator,
    model::{DisplayUnit, WeatherReport},
    presentation::{PanelStyle, Screen, Status, Surface, WeatherPanel, error_message},
    provider::WeatherProvider,
    recent::RecentSearches,
    store::{PersistedState, StateStore},
};

/// How a query was started; decides what gets recorded and which message an
/// error produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOrigin {
    City(String),
    Coordinates,
}

/// Handed out by [`Widget::begin`]. Only the ticket of the most recent query
/// may change what is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket {
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub unit: DisplayUnit,
    pub unit_toggle: UnitToggle,
    pub icon_base_url: String,
}

impl From<&Config> for WidgetSettings {
    fn from(config: &Config) -> Self {
        Self {
            unit: config.unit,
            unit_toggle: config.unit_toggle,
            icon_base_url: config.icon_base_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Loading,
    Error(String),
    Loaded(WeatherReport),
}

/// Everything the widget remembers between user actions.
#[derive(Debug)]
struct AppState {
    unit: DisplayUnit,
    recent: RecentSearches,
    last_city: Option<String>,
    /// Contents of the city input, re-queried on a Celsius switch-back under
    /// [`UnitToggle::Requery`].
    input: String,
    phase: Phase,
    generation: u64,
}

/// The weather widget: owns its state, talks to the provider through the
/// dispatcher, persists through `S` and draws through `V`.
#[derive(Debug)]
pub struct Widget<P, S, V> {
    dispatcher: QueryDispatcher<P>,
    store: S,
    surface: V,
    style: PanelStyle,
    state: AppState,
}

impl<P, S, V> Widget<P, S, V>
where
    P: WeatherProvider,
    S: StateStore,
    V: Surface,
{
    /// Reads persisted state once; unreadable state starts the widget empty
    /// and a blank saved city counts as no city.
    pub fn new(provider: P, store: S, surface: V, settings: WidgetSettings) -> Self {
        let persisted = store.load().unwrap_or_else(|err| {
            tracing::warn!("ignoring unreadable saved state: {err:#}");
            PersistedState::default()
        });

        let last_city = persisted.last_city.filter(|city| !city.trim().is_empty());

        let state = AppState {
            unit: settings.unit,
            recent: RecentSearches::from_persisted(persisted.recent_searches),
            input: last_city.clone().unwrap_or_default(),
            last_city,
            phase: Phase::Idle,
            generation: 0,
        };

        Self {
            dispatcher: QueryDispatcher::new(provider),
            store,
            surface,
            style: PanelStyle {
                icon_base_url: settings.icon_base_url,
                unit_toggle: settings.unit_toggle,
            },
            state,
        }
    }

    pub fn dispatcher(&self) -> &QueryDispatcher<P> {
        &self.dispatcher
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn unit(&self) -> DisplayUnit {
        self.state.unit
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.state.recent
    }

    pub fn last_city(&self) -> Option<&str> {
        self.state.last_city.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.state.input
    }

    /// The report behind the Loaded state, with its original Celsius values.
    pub fn report(&self) -> Option<&WeatherReport> {
        match &self.state.phase {
            Phase::Loaded(report) => Some(report),
            _ => None,
        }
    }

    pub fn screen(&self) -> Screen {
        let status = match &self.state.phase {
            Phase::Idle => Status::Idle,
            Phase::Loading => Status::Loading,
            Phase::Error(message) => Status::Error(message.clone()),
            Phase::Loaded(report) => Status::Loaded(Box::new(WeatherPanel::build(
                report,
                self.state.unit,
                &self.style,
            ))),
        };

        Screen {
            status,
            unit: self.state.unit,
            recent: self.state.recent.to_vec(),
        }
    }

    /// Draw the current screen.
    pub fn present(&mut self) {
        let screen = self.screen();
        self.surface.present(&screen);
    }

    /// Start a query: supersedes any query still in flight, clears an
    /// error and shows the loading state.
    pub fn begin(&mut self) -> QueryTicket {
        self.state.generation += 1;
        self.state.phase = Phase::Loading;
        self.present();

        QueryTicket { generation: self.state.generation }
    }

    /// Apply the outcome of the query `ticket` was issued for.
    ///
    /// Returns `false`, leaving everything untouched, when a newer query has
    /// been started since.
    pub fn finish(
        &mut self,
        ticket: QueryTicket,
        origin: QueryOrigin,
        outcome: Result<WeatherReport, QueryError>,
    ) -> bool {
        if ticket.generation != self.state.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.state.generation,
                "dropping superseded query result"
            );
            return false;
        }

        self.state.phase = match outcome {
            Ok(report) => {
                match &origin {
                    QueryOrigin::City(name) => self.remember(name.trim().to_string()),
                    // Coordinates over open water or unpopulated land resolve
                    // to an empty name, which is not worth keeping.
                    QueryOrigin::Coordinates => {
                        let name = report.snapshot.location_name.trim();
                        if !name.is_empty() {
                            self.state.input = name.to_string();
                            self.remember(name.to_string());
                        }
                    }
                }
                Phase::Loaded(report)
            }
            Err(err) => {
                tracing::debug!(error = %err, ?origin, "query failed");
                Phase::Error(error_message(&err, &origin))
            }
        };

        self.present();
        true
    }

    /// Look up `input` as a city name.
    pub async fn search_city(&mut self, input: &str) {
        self.state.input = input.to_string();

        let ticket = self.begin();
        let outcome = self.dispatcher.fetch_by_city(input).await;
        self.finish(ticket, QueryOrigin::City(input.to_string()), outcome);
    }

    /// Re-run a recent search with its exact stored name.
    pub async fn select_recent(&mut self, city: &str) {
        self.search_city(city).await;
    }

    /// Look up weather wherever `locator` says we are.
    pub async fn search_here(&mut self, locator: &dyn Geolocator) {
        let ticket = self.begin();

        let outcome = match locator.locate().await {
            Ok(coordinates) => self.dispatcher.fetch_by_coordinates(coordinates).await,
            Err(err) => Err(QueryError::from(err)),
        };

        self.finish(ticket, QueryOrigin::Coordinates, outcome);
    }

    /// Startup: show the last city from the previous session, if any.
    pub async fn restore(&mut self) {
        match self.state.last_city.clone() {
            Some(city) => self.search_city(&city).await,
            None => self.present(),
        }
    }

    pub async fn switch_unit(&mut self, unit: DisplayUnit) {
        if unit == self.state.unit {
            return;
        }
        self.state.unit = unit;

        if self.style.unit_toggle == UnitToggle::Requery && unit == DisplayUnit::Celsius {
            let input = self.state.input.clone();
            self.search_city(&input).await;
        } else {
            self.present();
        }
    }

    fn remember(&mut self, city: String) {
        self.state.recent.record(&city);
        self.state.last_city = Some(city);

        let persisted = PersistedState {
            last_city: self.state.last_city.clone(),
            recent_searches: self.state.recent.to_vec(),
        };

        if let Err(err) = self.store.save(&persisted) {
            tracing::warn!("failed to save recent searches: {err:#}");
        }
    }
}
