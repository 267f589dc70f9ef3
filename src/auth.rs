use std::collections::BTreeSet;
use std::fmt;

use axum::http::{HeaderMap, header};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const AUTH_COOKIE: &str = "auth_token";

/// Bearer token handed to every upstream call. Never read from ambient state.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Looks for a bearer `Authorization` header first, then the `auth_token` cookie.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let from_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        if let Some(token) = from_header {
            return Some(Self::new(token));
        }

        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == AUTH_COOKIE && !value.is_empty())
            .map(|(_, value)| Self::new(value))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
    Accountant,
    Teacher,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageClasses,
    ManageCourses,
    ManageTeachers,
    ManageStudents,
    ViewSchedules,
    ManageSchedules,
    ViewWallets,
    ExportData,
}

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::ManageClasses,
        Permission::ManageCourses,
        Permission::ManageTeachers,
        Permission::ManageStudents,
        Permission::ViewSchedules,
        Permission::ManageSchedules,
        Permission::ViewWallets,
        Permission::ExportData,
    ];
}

/// Capabilities granted to the signed-in user, resolved once per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn for_role(role: Role) -> Self {
        use Permission::*;

        let granted: &[Permission] = match role {
            Role::Admin => &Permission::ALL,
            Role::Staff => &[
                ManageClasses,
                ManageCourses,
                ManageTeachers,
                ManageStudents,
                ViewSchedules,
                ManageSchedules,
                ExportData,
            ],
            Role::Accountant => &[ViewWallets, ExportData],
            Role::Teacher => &[ViewSchedules],
            Role::Student => &[],
        };

        Self(granted.iter().copied().collect())
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.allows(permission) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Missing permission: {:?}",
                permission
            )))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}
