use async_trait::async_trait;

use crate::{Result, TradeOutcome, TradeResult};

/// Store of trade outcomes that feeds the weight adapter.
///
/// Scoring only ever reads a snapshot through `load`. Writers record a trade
/// when a signal is acted on and resolve it once the result is known; the
/// new outcome takes effect on the next scoring call.
#[async_trait]
pub trait TradeHistory: Send + Sync {
    /// Snapshot of all records in append order.
    async fn load(&self) -> Result<Vec<TradeOutcome>>;

    /// Append a record (resolved or still open).
    async fn record(&self, outcome: TradeOutcome) -> Result<()>;

    /// Attach the realised result to a previously recorded trade.
    async fn resolve(&self, id: &str, result: TradeResult) -> Result<()>;
}
