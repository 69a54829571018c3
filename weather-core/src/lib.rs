//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com provider behind a small trait
//! - The screens (landing form, weather detail) and the router tying them together
//!
//! It is used by `weather-cli`, but holds no terminal code, so other front-ends can drive
//! [`App`] the same way.

pub mod app;
pub mod config;
pub mod detail;
pub mod error;
pub mod landing;
pub mod model;
pub mod provider;
pub mod route;

pub use app::App;
pub use config::Config;
pub use detail::{RequestState, WeatherView};
pub use error::{FetchError, ValidationError};
pub use landing::LandingForm;
pub use model::WeatherReport;
pub use provider::{WeatherProvider, provider_from_config};
pub use route::Route;
