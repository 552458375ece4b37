//! Configuration for the ledger service

/// Configuration for the ledger service
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// How many times a lost rating race is retried before surfacing a
    /// conflict to the caller
    pub max_conflict_retries: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: 5,
        }
    }
}

impl LedgerConfig {
    /// Set the conflict retry budget
    pub fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }
}
