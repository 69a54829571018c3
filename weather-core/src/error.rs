use thiserror::Error;

pub const CITY_REQUIRED: &str = "City name is required";
pub const FETCH_FAILED: &str = "Unable to fetch weather data. Please check the city name.";

/// Rejected landing form submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", CITY_REQUIRED)]
    EmptyCity,
}

/// Any failed lookup, collapsed to the one message users see.
///
/// Transport errors, non-success statuses and malformed bodies all end up
/// here; the cause is logged, not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", FETCH_FAILED)]
pub struct FetchError;
