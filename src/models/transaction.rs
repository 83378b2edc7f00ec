use serde::{Deserialize, Serialize};

use crate::models::int_or_string;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TopUpRequest {
    pub top_up_amount: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentRequest {
    pub service_code: String,
    pub service_amount: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransactionRecord {
    pub invoice_number: String,
    /// "TOPUP" for credits, otherwise the service code of the debit.
    pub transaction_type: String,
    pub description: String,
    pub total_amount: i64,
    pub created_on: String,
}

/// One page of the transaction history as the server returns it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistoryPage {
    #[serde(deserialize_with = "int_or_string")]
    pub offset: i64,
    #[serde(deserialize_with = "int_or_string")]
    pub limit: i64,
    pub records: Vec<TransactionRecord>,
}
