use crate::auth::{Credential, PermissionSet};
use crate::error::AppError;
use crate::models::Profile;

use super::Resources;

pub const PROFILE: &str = "profile";

impl Resources {
    /// The signed-in account. Cached per credential like any other query.
    pub async fn current_profile(&self, credential: &Credential) -> Result<Profile, AppError> {
        self.cached_get(PROFILE, credential, "/auth/me", &[]).await
    }

    pub async fn permissions(&self, credential: &Credential) -> Result<(Profile, PermissionSet), AppError> {
        let profile = self.current_profile(credential).await?;
        let permissions = PermissionSet::for_role(profile.role);
        Ok((profile, permissions))
    }
}
