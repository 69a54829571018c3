use std::fmt;

const WEATHER_PREFIX: &str = "/weather";

/// Every screen the application can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Landing,
    /// `/weather/{city}`; `city` is the raw path segment.
    Weather { city: String },
    /// Anything else.
    NotFound { path: String },
}

impl Route {
    pub fn weather(city: impl Into<String>) -> Self {
        Route::Weather { city: city.into() }
    }

    /// Where navigating to `/weather/{city}` lands, with `city` inserted
    /// verbatim. A city containing `/` does not fit the single segment and
    /// resolves to `NotFound`, same as opening that path.
    pub fn for_city(city: &str) -> Self {
        Route::parse(&format!("{WEATHER_PREFIX}/{city}"))
    }

    /// Map a path to its route. Never fails: unknown paths become `NotFound`.
    ///
    /// `/weather` and `/weather/` map to an empty city so the detail view can
    /// bounce the user back to the landing page.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() || path == "/" {
            return Route::Landing;
        }

        if let Some(rest) = path.strip_prefix(WEATHER_PREFIX) {
            if rest.is_empty() {
                return Route::weather("");
            }
            if let Some(city) = rest.strip_prefix('/') {
                if !city.contains('/') {
                    return Route::weather(city);
                }
            }
        }

        Route::NotFound { path: path.to_string() }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Weather { city } => format!("{WEATHER_PREFIX}/{city}"),
            Route::NotFound { path } => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
