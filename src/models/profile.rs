use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// The signed-in account as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub fullname: Option<String>,
    pub role: Role,
}
