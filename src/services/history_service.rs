use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::PortalError;
use crate::models::transaction::TransactionRecord;
use crate::repositories::PortalGateway;

pub const DEFAULT_PAGE_LIMIT: i64 = 5;

/// Transaction history slice: an append-only accumulation of pages plus the
/// cursor over it. The cursor advances by the number of records actually
/// received, so a short final page still moves the offset past the end; a
/// short page is also the exhaustion signal.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    pub transactions: Vec<TransactionRecord>,
    pub offset: i64,
    pub limit: i64,
    pub has_more: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
            has_more: true,
            is_loading: false,
            error: None,
        }
    }
}

impl HistoryState {
    fn pending(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn fulfilled(&mut self, records: Vec<TransactionRecord>, requested_limit: i64) {
        self.is_loading = false;
        let received = records.len() as i64;
        self.transactions.extend(records);
        self.offset += received;
        self.has_more = received == requested_limit;
    }

    fn rejected(&mut self, message: String) {
        self.is_loading = false;
        self.error = Some(message);
        // stop further pagination attempts until a reset
        self.has_more = false;
    }

    /// Back to the initial cursor. Used whenever the month filter changes;
    /// filter and cursor are never mixed across filter values.
    fn reset(&mut self) {
        self.transactions = Vec::new();
        self.offset = 0;
        self.has_more = true;
        self.is_loading = false;
        self.error = None;
    }
}

pub struct HistoryService {
    gateway: Arc<dyn PortalGateway>,
    state: HistoryState,
}

impl HistoryService {
    pub fn new(gateway: Arc<dyn PortalGateway>) -> Self {
        Self {
            gateway,
            state: HistoryState::default(),
        }
    }

    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Fetches the next page at the current cursor. A fetch is never issued
    /// while one is already in flight.
    pub async fn fetch_page(&mut self, month: Option<u32>) {
        if self.state.is_loading {
            return;
        }
        let offset = self.state.offset;
        let limit = self.state.limit;
        self.state.pending();
        debug!("fetching history page offset={} limit={} month={:?}", offset, limit, month);
        match self.gateway.transaction_history(offset, limit, month).await {
            Ok(page) => self.state.fulfilled(page.records, limit),
            Err(e) => {
                warn!("history fetch failed: {}", e);
                self.state.rejected(e.to_string());
            }
        }
    }
}
