use serde::Serialize;

use crate::models::{WalletDelta, WalletDeltaSummary, WalletType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRow {
    pub wallet: WalletType,
    #[serde(flatten)]
    pub delta: WalletDelta,
    pub expected_closing: i128,
    pub discrepancy: i128,
    pub balanced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletReport {
    pub rows: Vec<WalletRow>,
    pub totals: WalletTotals,
    pub unbalanced: usize,
}

/// Column sums across wallet types. Widened so large upstream amounts cannot overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalletTotals {
    pub opening: i128,
    pub closing: i128,
    #[serde(rename = "in")]
    pub inflow: i128,
    #[serde(rename = "out")]
    pub outflow: i128,
}

pub fn reconcile_row(wallet: WalletType, delta: WalletDelta) -> WalletRow {
    let expected_closing =
        i128::from(delta.opening) + i128::from(delta.inflow) - i128::from(delta.outflow);
    let discrepancy = i128::from(delta.closing) - expected_closing;
    WalletRow {
        wallet,
        delta,
        expected_closing,
        discrepancy,
        balanced: discrepancy == 0,
    }
}

/// Checks closing = opening + in - out per wallet type. Only reports, never rejects.
pub fn reconcile(summary: &WalletDeltaSummary) -> WalletReport {
    let rows: Vec<WalletRow> = summary
        .iter()
        .map(|(wallet, delta)| reconcile_row(*wallet, *delta))
        .collect();

    let totals = rows.iter().fold(WalletTotals::default(), |acc, row| WalletTotals {
        opening: acc.opening + i128::from(row.delta.opening),
        closing: acc.closing + i128::from(row.delta.closing),
        inflow: acc.inflow + i128::from(row.delta.inflow),
        outflow: acc.outflow + i128::from(row.delta.outflow),
    });
    let unbalanced = rows.iter().filter(|r| !r.balanced).count();

    WalletReport {
        rows,
        totals,
        unbalanced,
    }
}
