use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use common::{Error, Result, TradeHistory, TradeOutcome, TradeResult};

/// In-memory trade outcome history.
///
/// Records stay in append order. Cloning the handle shares the same ledger, so
/// a recorder task and a scoring task can hold one each.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    outcomes: Arc<RwLock<Vec<TradeOutcome>>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ledger with previously persisted records.
    pub fn with_outcomes(outcomes: Vec<TradeOutcome>) -> Self {
        info!(records = outcomes.len(), "MemoryHistory initialized");
        Self {
            outcomes: Arc::new(RwLock::new(outcomes)),
        }
    }

    pub async fn len(&self) -> usize {
        self.outcomes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.outcomes.read().await.is_empty()
    }
}

#[async_trait]
impl TradeHistory for MemoryHistory {
    async fn load(&self) -> Result<Vec<TradeOutcome>> {
        Ok(self.outcomes.read().await.clone())
    }

    async fn record(&self, outcome: TradeOutcome) -> Result<()> {
        debug!(
            id = %outcome.id,
            pair = %outcome.pair,
            direction = %outcome.direction,
            entry = outcome.entry,
            resolved = outcome.is_resolved(),
            "Trade outcome recorded"
        );
        self.outcomes.write().await.push(outcome);
        Ok(())
    }

    async fn resolve(&self, id: &str, result: TradeResult) -> Result<()> {
        let mut outcomes = self.outcomes.write().await;
        let outcome = outcomes
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::InvalidInput(format!("no recorded trade with id '{id}'")))?;
        outcome.result = Some(result);
        debug!(id = %id, pair = %outcome.pair, ?result, "Trade outcome resolved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::Direction;

    #[tokio::test]
    async fn records_keep_append_order() {
        let history = MemoryHistory::new();
        let first = TradeOutcome::open("EUR/USD", Direction::Buy, 1.10, Utc::now());
        let second = TradeOutcome::open("USD/JPY", Direction::Sell, 150.0, Utc::now());
        history.record(first.clone()).await.unwrap();
        history.record(second.clone()).await.unwrap();

        let loaded = history.load().await.unwrap();
        assert_eq!(loaded, vec![first, second]);
    }

    #[tokio::test]
    async fn resolve_sets_result_on_matching_record() {
        let history = MemoryHistory::new();
        let trade = TradeOutcome::open("XAU/USD", Direction::Buy, 2400.0, Utc::now());
        let id = trade.id.clone();
        history.record(trade).await.unwrap();

        history.resolve(&id, TradeResult::Win).await.unwrap();

        let loaded = history.load().await.unwrap();
        assert_eq!(loaded[0].result, Some(TradeResult::Win));
    }

    #[tokio::test]
    async fn resolve_unknown_id_is_invalid_input() {
        let history = MemoryHistory::new();
        let err = history.resolve("missing", TradeResult::Loss).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn cloned_handles_share_one_ledger() {
        let history = MemoryHistory::new();
        let reader = history.clone();
        history
            .record(TradeOutcome::open("BTC/USD", Direction::Sell, 60_000.0, Utc::now()))
            .await
            .unwrap();
        assert_eq!(reader.len().await, 1);
        assert!(!reader.is_empty().await);
    }

    #[tokio::test]
    async fn seeded_ledger_loads_seed() {
        let seed = vec![
            TradeOutcome::open("EUR/USD", Direction::Buy, 1.1, Utc::now()).with_result(TradeResult::Win),
        ];
        let history = MemoryHistory::with_outcomes(seed.clone());
        assert_eq!(history.load().await.unwrap(), seed);
    }
}
