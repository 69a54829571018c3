//! The weather detail view.
//!
//! Each activation hands out a [`Ticket`]. The fetch result is applied with
//! [`WeatherView::settle`], which drops it unless the ticket still belongs to
//! the latest activation. A slow response for an earlier city can therefore
//! never overwrite the state of a later one, and nothing lands after unmount.

use std::fmt;

use tracing::{debug, info};

use crate::{
    error::FetchError,
    model::WeatherReport,
    provider::WeatherProvider,
    route::Route,
};

pub const LOADING: &str = "Loading...";

/// A report together with its Fahrenheit value, computed once on arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub report: WeatherReport,
    pub temperature_f: f64,
}

impl Loaded {
    pub fn new(report: WeatherReport) -> Self {
        let temperature_f = report.temperature_f();
        Self { report, temperature_f }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Loading,
    Failed(FetchError),
    Loaded(Loaded),
}

impl RequestState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, RequestState::Loading)
    }
}

/// Proof of one activation; must be handed back to `settle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    city: String,
}

impl Ticket {
    pub fn city(&self) -> &str {
        &self.city
    }
}

/// What the caller has to do after activating the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// No city: go here instead, nothing is fetched.
    Redirect(Route),
    /// Fetch current conditions for `ticket.city()`.
    Fetch(Ticket),
}

#[derive(Debug, Clone)]
pub struct WeatherView {
    generation: u64,
    city: String,
    state: RequestState,
}

impl Default for WeatherView {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherView {
    pub fn new() -> Self {
        Self { generation: 0, city: String::new(), state: RequestState::Loading }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Enter the view for `city`. Always starts a fresh cycle, even when the
    /// city is unchanged.
    pub fn activate(&mut self, city: &str) -> Activation {
        self.generation = self.generation.wrapping_add(1);
        self.city = city.to_string();
        self.state = RequestState::Loading;

        if city.is_empty() {
            debug!("weather view opened without a city; redirecting to landing");
            return Activation::Redirect(Route::Landing);
        }

        Activation::Fetch(Ticket { generation: self.generation, city: self.city.clone() })
    }

    /// Invalidate every outstanding ticket.
    pub fn unmount(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Apply a fetch outcome. Returns `false` if the ticket was stale and the
    /// outcome was dropped.
    pub fn settle(&mut self, ticket: &Ticket, outcome: anyhow::Result<WeatherReport>) -> bool {
        if ticket.generation != self.generation {
            debug!(city = %ticket.city, "discarding stale weather response");
            return false;
        }

        self.state = match outcome {
            Ok(report) => {
                info!(city = %ticket.city, location = %report.location_name, "weather loaded");
                RequestState::Loaded(Loaded::new(report))
            }
            Err(err) => {
                debug!(city = %ticket.city, error = ?err, "weather fetch failed");
                RequestState::Failed(FetchError)
            }
        };
        true
    }

    /// Activate, fetch and settle in one go.
    pub async fn load(&mut self, provider: &dyn WeatherProvider, city: &str) -> Activation {
        let activation = self.activate(city);
        if let Activation::Fetch(ticket) = &activation {
            debug!(city = %ticket.city, "fetching current conditions");
            let outcome = provider.fetch_current(ticket.city()).await;
            self.settle(ticket, outcome);
        }
        activation
    }
}

impl fmt::Display for WeatherView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            RequestState::Loading => writeln!(f, "{LOADING}"),
            RequestState::Failed(err) => writeln!(f, "{err}"),
            RequestState::Loaded(Loaded { report, temperature_f }) => {
                writeln!(f, "Weather in {}", report.location_name)?;
                writeln!(
                    f,
                    "Temperature: {} °C / {:.2} °F",
                    unsigned_zero(report.temperature_c),
                    temperature_f
                )?;
                writeln!(f, "Humidity: {}%", report.humidity_pct)?;
                writeln!(f, "Wind Speed: {} kph", unsigned_zero(report.wind_kph))?;
                writeln!(f, "Condition: {}", report.condition)?;
                if let Some(at) = report.observation_time {
                    writeln!(f, "Last updated: {}", at.format("%Y-%m-%d %H:%M UTC"))?;
                }
                Ok(())
            }
        }
    }
}

/// `-0.0` prints as "-0"; show it as "0".
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    pub(crate) fn report(name: &str, temp_c: f64) -> WeatherReport {
        WeatherReport {
            location_name: name.to_string(),
            temperature_c: temp_c,
            humidity_pct: 40,
            wind_kph: 7.2,
            condition: "Sunny".to_string(),
            observation_time: None,
        }
    }

    /// In-memory provider: answers from a fixed temperature, or fails.
    #[derive(Debug, Default)]
    pub(crate) struct FakeProvider {
        pub(crate) temp_c: Option<f64>,
        pub(crate) calls: AtomicUsize,
        pub(crate) cities: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        pub(crate) fn answering(temp_c: f64) -> Self {
            Self { temp_c: Some(temp_c), ..Self::default() }
        }

        pub(crate) fn failing() -> Self {
            Self::default()
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_current(&self, city: &str) -> anyhow::Result<WeatherReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.cities.lock().unwrap().push(city.to_string());
            match self.temp_c {
                Some(t) => Ok(report(city, t)),
                None => Err(anyhow::anyhow!("connection refused")),
            }
        }
    }

    fn fahrenheit_line(view: &WeatherView) -> String {
        view.to_string()
            .lines()
            .find(|l| l.starts_with("Temperature:"))
            .expect("loaded view renders a temperature line")
            .to_string()
    }

    #[test]
    fn starts_loading() {
        let mut view = WeatherView::new();
        assert!(matches!(view.activate("Rome"), Activation::Fetch(_)));
        assert_eq!(view.state(), &RequestState::Loading);
        assert_eq!(view.to_string(), "Loading...\n");
    }

    #[tokio::test]
    async fn zero_celsius_renders_32_fahrenheit() {
        let provider = FakeProvider::answering(0.0);
        let mut view = WeatherView::new();
        view.load(&provider, "Oslo").await;

        assert_eq!(fahrenheit_line(&view), "Temperature: 0 °C / 32.00 °F");
    }

    #[tokio::test]
    async fn hundred_celsius_renders_212_fahrenheit() {
        let provider = FakeProvider::answering(100.0);
        let mut view = WeatherView::new();
        view.load(&provider, "Death Valley").await;

        assert_eq!(fahrenheit_line(&view), "Temperature: 100 °C / 212.00 °F");
    }

    #[test]
    fn negative_zero_celsius_renders_as_zero() {
        let mut view = WeatherView::new();
        let Activation::Fetch(ticket) = view.activate("Reykjavik") else {
            panic!("expected a fetch")
        };
        view.settle(&ticket, Ok(report("Reykjavik", -0.0)));

        assert_eq!(fahrenheit_line(&view), "Temperature: 0 °C / 32.00 °F");
    }

    #[tokio::test]
    async fn loaded_view_renders_all_fields() {
        let provider = FakeProvider::answering(21.5);
        let mut view = WeatherView::new();
        view.load(&provider, "Lisbon").await;

        assert_eq!(
            view.to_string(),
            "Weather in Lisbon\n\
             Temperature: 21.5 °C / 70.70 °F\n\
             Humidity: 40%\n\
             Wind Speed: 7.2 kph\n\
             Condition: Sunny\n"
        );
    }

    #[tokio::test]
    async fn empty_city_redirects_without_fetching() {
        let provider = FakeProvider::answering(10.0);
        let mut view = WeatherView::new();

        let activation = view.load(&provider, "").await;

        assert_eq!(activation, Activation::Redirect(Route::Landing));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn failure_renders_generic_message() {
        let provider = FakeProvider::failing();
        let mut view = WeatherView::new();
        view.load(&provider, "Atlantis").await;

        assert_eq!(view.state(), &RequestState::Failed(FetchError));
        assert_eq!(
            view.to_string().trim_end(),
            "Unable to fetch weather data. Please check the city name."
        );
    }

    #[tokio::test]
    async fn same_city_again_is_a_new_fetch_cycle() {
        let provider = FakeProvider::answering(5.0);
        let mut view = WeatherView::new();

        view.load(&provider, "Bern").await;
        assert_eq!(provider.calls(), 1);

        let activation = view.activate("Bern");
        assert_eq!(view.state(), &RequestState::Loading);

        let Activation::Fetch(ticket) = activation else { panic!("expected a fetch") };
        let outcome = provider.fetch_current(ticket.city()).await;
        assert!(view.settle(&ticket, outcome));

        assert_eq!(provider.calls(), 2);
        assert!(view.state().is_settled());
    }

    #[test]
    fn stale_response_does_not_overwrite_newer_city() {
        let mut view = WeatherView::new();

        let Activation::Fetch(first) = view.activate("Paris") else { panic!("expected a fetch") };
        let Activation::Fetch(second) = view.activate("Berlin") else { panic!("expected a fetch") };

        assert!(view.settle(&second, Ok(report("Berlin", 3.0))));
        assert!(!view.settle(&first, Ok(report("Paris", 20.0))));

        match view.state() {
            RequestState::Loaded(loaded) => assert_eq!(loaded.report.location_name, "Berlin"),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn late_failure_for_old_ticket_is_ignored() {
        let mut view = WeatherView::new();

        let Activation::Fetch(first) = view.activate("Paris") else { panic!("expected a fetch") };
        let Activation::Fetch(second) = view.activate("Berlin") else { panic!("expected a fetch") };

        assert!(!view.settle(&first, Err(anyhow::anyhow!("timeout"))));
        assert_eq!(view.state(), &RequestState::Loading);
        assert!(view.settle(&second, Ok(report("Berlin", 3.0))));
    }

    #[test]
    fn nothing_lands_after_unmount() {
        let mut view = WeatherView::new();
        let Activation::Fetch(ticket) = view.activate("Madrid") else { panic!("expected a fetch") };

        view.unmount();

        assert!(!view.settle(&ticket, Ok(report("Madrid", 30.0))));
        assert_eq!(view.state(), &RequestState::Loading);
    }

    #[test]
    fn fahrenheit_is_computed_with_the_report() {
        let loaded = Loaded::new(report("X", 37.0));
        assert_eq!(format!("{:.2}", loaded.temperature_f), "98.60");
    }
}
