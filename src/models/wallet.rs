use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Balance bucket tracked per student. The server keys them `v1` through `v7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
}

impl WalletType {
    pub const ALL: [WalletType; 7] = [
        WalletType::V1,
        WalletType::V2,
        WalletType::V3,
        WalletType::V4,
        WalletType::V5,
        WalletType::V6,
        WalletType::V7,
    ];
}

/// Opening/closing balance and period movements of one wallet type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletDelta {
    #[serde(default)]
    pub opening: i64,
    #[serde(default)]
    pub closing: i64,
    #[serde(default, rename = "in")]
    pub inflow: i64,
    #[serde(default, rename = "out")]
    pub outflow: i64,
}

pub type WalletDeltaSummary = BTreeMap<WalletType, WalletDelta>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletPeriod {
    #[serde(default)]
    pub from: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub to: Option<chrono::NaiveDate>,
}
