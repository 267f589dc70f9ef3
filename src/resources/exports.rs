use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::Deserialize;

use crate::auth::Credential;
use crate::error::AppError;
use crate::upstream::Download;

use super::Resources;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Students,
    Teachers,
    Classes,
    Schedules,
    Wallets,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Students => "students",
            ExportKind::Teachers => "teachers",
            ExportKind::Classes => "classes",
            ExportKind::Schedules => "schedules",
            ExportKind::Wallets => "wallets",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "students" => Ok(ExportKind::Students),
            "teachers" => Ok(ExportKind::Teachers),
            "classes" => Ok(ExportKind::Classes),
            "schedules" => Ok(ExportKind::Schedules),
            "wallets" => Ok(ExportKind::Wallets),
            other => Err(AppError::BadRequest(format!("Unknown export: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Pdf,
    Zip,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Zip => "zip",
        }
    }
}

impl Resources {
    /// Downloads an export artifact. Exports are never cached.
    pub async fn export(
        &self,
        credential: &Credential,
        kind: ExportKind,
        format: ExportFormat,
    ) -> Result<Download, AppError> {
        let fallback = format!(
            "{}-{}.{}",
            kind,
            Utc::now().format("%Y%m%d"),
            format.extension()
        );
        self.api
            .download(
                credential,
                &format!("/exports/{}", kind),
                &[("format", format.extension().to_string())],
                &fallback,
            )
            .await
    }
}
