use thiserror::Error;

use crate::indicators::IndicatorError;
use crate::services::market_data::FetchError;

/// Why a signal could not be computed.
///
/// None of these are fatal; the caller decides how to render them.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("market data unavailable: {0}")]
    AcquisitionFailure(#[source] FetchError),
    /// The upstream answered but had no rows for the request.
    #[error("no market data returned for {symbol}")]
    NoData { symbol: String },
    #[error("market data is missing `{0}`")]
    SchemaMismatch(String),
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] IndicatorError),
}

impl SignalError {
    /// Stable tag for logs, metrics labels and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalError::AcquisitionFailure(_) => "acquisition_failure",
            SignalError::NoData { .. } => "no_data",
            SignalError::SchemaMismatch(_) => "schema_mismatch",
            SignalError::InvalidParameters(_) => "invalid_parameters",
        }
    }
}

impl From<FetchError> for SignalError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::SchemaMismatch(field) => SignalError::SchemaMismatch(field),
            other => SignalError::AcquisitionFailure(other),
        }
    }
}

pub type SignalResult<T> = Result<T, SignalError>;

pub trait SignalResultExt<T> {
    /// Collapse any failure into `T::default()` (an empty list, zero).
    fn or_empty(self) -> T;
}

impl<T: Default> SignalResultExt<T> for SignalResult<T> {
    fn or_empty(self) -> T {
        self.unwrap_or_default()
    }
}
