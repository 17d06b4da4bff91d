use crate::lookup::LookupError;
use crate::models::InvalidRequest;

/// Errors returned by history operations that can fail.
///
/// Storage problems are not listed here: persistence is best-effort and a
/// failed write is logged while the in-memory change stands.
#[derive(Debug)]
pub enum HistoryError {
    /// Dish name or servings rejected before any lookup was made
    InvalidInput(InvalidRequest),
    /// The lookup service failed; history was left untouched
    Lookup(LookupError),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::InvalidInput(e) => write!(f, "{}", e),
            HistoryError::Lookup(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::InvalidInput(e) => Some(e),
            HistoryError::Lookup(e) => Some(e),
        }
    }
}

impl From<InvalidRequest> for HistoryError {
    fn from(e: InvalidRequest) -> Self {
        HistoryError::InvalidInput(e)
    }
}

impl From<LookupError> for HistoryError {
    fn from(e: LookupError) -> Self {
        HistoryError::Lookup(e)
    }
}
