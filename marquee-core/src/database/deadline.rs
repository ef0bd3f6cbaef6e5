use std::{future::Future, time::Duration};

use tracing::warn;

use crate::error::{Result, StoreError};

/// Upper bound on how long a single store operation may take.
///
/// Expiry drops the in-flight future, which cancels the statement on the
/// client side, and surfaces as [`StoreError::Timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDeadline {
    after: Duration,
}

impl QueryDeadline {
    pub const DEFAULT: Duration = Duration::from_secs(3);

    pub fn new(after: Duration) -> Self {
        Self { after }
    }

    pub fn after(&self) -> Duration {
        self.after
    }

    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.after, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, after = ?self.after, "store operation timed out");
                Err(StoreError::Timeout {
                    operation,
                    after: self.after,
                })
            }
        }
    }
}

impl Default for QueryDeadline {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}
