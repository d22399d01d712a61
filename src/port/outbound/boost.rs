//! Boost status port.

use async_trait::async_trait;

use super::TransportError;
use crate::domain::boost::BoostEvent;

/// Source of the current boost campaign status.
#[async_trait]
pub trait BoostStatusSource: Send + Sync {
    /// Fetch the current boost.
    ///
    /// Any transport failure, non-success status or malformed payload is an
    /// error; callers skip the tick and try again on the next one.
    async fn fetch_status(&self) -> Result<BoostEvent, TransportError>;
}
