//! settlement waiter
//!
//! bounded poll-with-timeout primitive: resync ledger state and
//! re-check an expected effect until it holds or the wait budget is
//! exhausted. never busy-loops and never polls below a minimum
//! interval; exhaustion is a typed `SettlementTimeout` naming what was
//! being awaited.

use std::future::Future;
use std::time::Duration;

use potluck_ledger::LedgerClient;
use tokio::time::Instant;

use crate::error::{PoolError, Result};

/// floor for the polling interval
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// settlement polling parameters
#[derive(Clone, Copy, Debug)]
pub struct SettleConfig {
    /// delay between resync attempts
    pub poll_interval: Duration,
    /// total budget before `SettlementTimeout`
    pub max_wait: Duration,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            max_wait: Duration::from_secs(30),
        }
    }
}

impl SettleConfig {
    /// tight intervals for in-process ledgers and tests
    pub fn fast() -> Self {
        Self {
            poll_interval: Duration::from_millis(5),
            max_wait: Duration::from_millis(500),
        }
    }
}

/// sync then re-check `check` until it returns true or `max_wait`
/// elapses
///
/// blocks only the dependent phase; `what` names the awaited effect in
/// the timeout error
pub async fn wait_for<L, F, Fut>(
    client: &L,
    config: &SettleConfig,
    what: &str,
    mut check: F,
) -> Result<()>
where
    L: LedgerClient + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let interval = config.poll_interval.max(MIN_POLL_INTERVAL);
    let deadline = Instant::now() + config.max_wait;

    loop {
        client.sync().await.map_err(PoolError::from)?;
        if check().await? {
            return Ok(());
        }
        if Instant::now() + interval > deadline {
            tracing::warn!(what, "settlement wait exhausted");
            return Err(PoolError::SettlementTimeout {
                waiting_for: what.to_string(),
            });
        }
        tokio::time::sleep(interval).await;
    }
}
