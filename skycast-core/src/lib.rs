//! Core library for the `skycast` weather lookup tool.
//!
//! This crate defines:
//! - Configuration & persisted session state
//! - The OpenWeather client and the query dispatcher built on it
//! - Unit conversion, forecast day selection and recent-search bookkeeping
//! - The widget state machine and the view model it presents
//!
//! It is used by `skycast-cli`, but the [`Surface`] seam lets any front end
//! draw the same screens.

pub mod app;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod forecast;
pub mod geo;
pub mod model;
pub mod presentation;
pub mod provider;
pub mod recent;
pub mod store;
pub mod units;

pub use app::{QueryOrigin, QueryTicket, Widget, WidgetSettings};
pub use config::{Config, GeolocationMode, UnitToggle};
pub use dispatch::QueryDispatcher;
pub use error::{QueryError, TransportError};
pub use geo::{FixedLocation, Geolocator, IpGeolocator, LocationError, NoGeolocation};
pub use model::{
    Coordinates, DisplayUnit, ForecastPoint, LocationQuery, WeatherReport, WeatherSnapshot,
};
pub use presentation::{ForecastCard, RecordingSurface, Screen, Status, Surface, WeatherPanel};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use recent::RecentSearches;
pub use store::{FileStore, MemoryStore, PersistedState, StateStore};
