use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BalanceData {
    pub balance: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Service {
    pub service_code: String,
    pub service_name: String,
    pub service_icon: String,
    pub service_tariff: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Banner {
    pub banner_name: String,
    pub banner_image: String,
    pub description: String,
}

/// Cached balance with its provenance. A top-up or payment response pushes a
/// `Provisional` value into the cache without a round trip; the next
/// authoritative `GET /balance` overwrites it with `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachedBalance {
    Confirmed(i64),
    Provisional(i64),
}

impl CachedBalance {
    pub fn amount(self) -> i64 {
        match self {
            CachedBalance::Confirmed(amount) | CachedBalance::Provisional(amount) => amount,
        }
    }

    pub fn is_provisional(self) -> bool {
        matches!(self, CachedBalance::Provisional(_))
    }
}
