use crate::auth::Credential;
use crate::error::AppError;
use crate::models::{WalletDeltaSummary, WalletPeriod};

use super::Resources;

pub const WALLETS: &str = "wallets";

impl Resources {
    pub async fn wallet_delta_summary(
        &self,
        credential: &Credential,
        period: &WalletPeriod,
    ) -> Result<WalletDeltaSummary, AppError> {
        let mut query = Vec::new();
        if let Some(from) = period.from {
            query.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = period.to {
            query.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        self.cached_get(WALLETS, credential, "/wallets/delta-summary", &query)
            .await
    }
}
