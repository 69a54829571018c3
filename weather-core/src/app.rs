use std::fmt;

use tracing::{debug, info};

use crate::{
    detail::{Activation, Ticket, WeatherView},
    landing::LandingForm,
    provider::WeatherProvider,
    route::Route,
};

/// Application root: current route plus the state of each screen.
#[derive(Debug)]
pub struct App {
    route: Route,
    landing: LandingForm,
    weather: WeatherView,
    provider: Box<dyn WeatherProvider>,
}

impl App {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            route: Route::Landing,
            landing: LandingForm::new(),
            weather: WeatherView::new(),
            provider,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn landing(&self) -> &LandingForm {
        &self.landing
    }

    pub fn landing_mut(&mut self) -> &mut LandingForm {
        &mut self.landing
    }

    pub fn weather(&self) -> &WeatherView {
        &self.weather
    }

    /// Switch to `route` and run whatever the target screen does on entry.
    ///
    /// Returns once the screen has settled; for the detail view that means
    /// after its single request has completed. Use [`App::begin`] and
    /// [`App::finish`] to render the loading screen in between.
    pub async fn navigate(&mut self, route: Route) {
        if let Some(ticket) = self.begin(route) {
            self.finish(ticket).await;
        }
    }

    /// First half of a navigation: switch screens and activate the target.
    ///
    /// Returns a ticket when the detail view is now `Loading` and waits for
    /// [`App::finish`].
    pub fn begin(&mut self, route: Route) -> Option<Ticket> {
        info!(to = %route, "navigate");

        if let Route::Weather { city } = &route {
            let activation = self.weather.activate(city);
            self.route = route;
            return match activation {
                Activation::Fetch(ticket) => Some(ticket),
                Activation::Redirect(target) => {
                    self.enter(target);
                    None
                }
            };
        }

        self.weather.unmount();
        self.enter(route);
        None
    }

    /// Second half of a navigation: run the request for `ticket` and settle
    /// the detail view. Stale tickets are fetched but their result is dropped.
    pub async fn finish(&mut self, ticket: Ticket) {
        debug!(city = %ticket.city(), "fetching current conditions");
        let outcome = self.provider.fetch_current(ticket.city()).await;
        self.weather.settle(&ticket, outcome);
    }

    /// Same as [`App::navigate`] with a path string.
    pub async fn open(&mut self, path: &str) {
        self.navigate(Route::parse(path)).await;
    }

    /// Submit the landing form; navigates on success.
    pub async fn submit_landing(&mut self) -> bool {
        match self.landing.submit() {
            Ok(route) => {
                self.navigate(route).await;
                true
            }
            Err(_) => false,
        }
    }

    fn enter(&mut self, route: Route) {
        if route == Route::Landing {
            self.landing = LandingForm::new();
        }
        self.route = route;
    }
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.route {
            Route::Landing => write!(f, "{}", self.landing),
            Route::Weather { .. } => write!(f, "{}", self.weather),
            Route::NotFound { path } => writeln!(f, "Page not found: {path}"),
        }
    }
}
