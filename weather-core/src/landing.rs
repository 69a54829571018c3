//! The landing page: one text input and a search action.

use std::fmt;

use crate::{error::ValidationError, route::Route};

pub const TITLE: &str = "Weather App";
pub const PLACEHOLDER: &str = "Enter city name";

#[derive(Debug, Clone, Default)]
pub struct LandingForm {
    input: String,
    error: Option<ValidationError>,
}

impl LandingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Replace the input. Any pending validation error is cleared.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.error = None;
    }

    /// Validate and produce the navigation target.
    ///
    /// The input is trimmed only to decide whether it is empty; the target is
    /// `/weather/{input}` with the input exactly as typed, resolved by the
    /// router like any other path.
    pub fn submit(&mut self) -> Result<Route, ValidationError> {
        if self.input.trim().is_empty() {
            self.error = Some(ValidationError::EmptyCity);
            return Err(ValidationError::EmptyCity);
        }

        Ok(Route::for_city(&self.input))
    }
}

impl fmt::Display for LandingForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        if let Some(err) = &self.error {
            writeln!(f, "{err}")?;
        }
        Ok(())
    }
}
