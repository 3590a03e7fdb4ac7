use crate::store::error::LoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherOddsError {
    /// Out-of-range coordinates, an impossible calendar day, or a bad engine config.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No historical series available for location ({lat}, {lon})")]
    LocationNotFound { lat: f64, lon: f64 },

    #[error(transparent)]
    Load(#[from] LoadError),
}
