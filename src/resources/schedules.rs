use crate::auth::Credential;
use crate::error::AppError;
use crate::models::{AutoScheduleRequest, MakeupRecord, NewMakeupRequest, ScheduleEntry, ScheduleQuery};

use super::Resources;

pub const SCHEDULES: &str = "schedules";
pub const MAKEUP: &str = "makeup";

impl Resources {
    pub async fn list_schedules(
        &self,
        credential: &Credential,
        filter: &ScheduleQuery,
    ) -> Result<Vec<ScheduleEntry>, AppError> {
        let mut query = Vec::new();
        if let Some(class_id) = &filter.class_id {
            query.push(("classId", class_id.clone()));
        }
        if let Some(teacher_id) = &filter.teacher_id {
            query.push(("teacherId", teacher_id.clone()));
        }
        self.cached_get(SCHEDULES, credential, "/schedules", &query)
            .await
    }

    pub async fn list_makeup_records(
        &self,
        credential: &Credential,
    ) -> Result<Vec<MakeupRecord>, AppError> {
        self.cached_get(MAKEUP, credential, "/schedules/makeup", &[])
            .await
    }

    pub async fn create_makeup(
        &self,
        credential: &Credential,
        req: &NewMakeupRequest,
    ) -> Result<ScheduleEntry, AppError> {
        let entry = self.api.post(credential, "/schedules/makeup", req).await?;
        self.invalidate(&[SCHEDULES, MAKEUP]).await;
        Ok(entry)
    }

    /// Asks the server to assign slots for every lesson of a class. Conflict
    /// resolution happens upstream.
    pub async fn auto_schedule(
        &self,
        credential: &Credential,
        req: &AutoScheduleRequest,
    ) -> Result<Vec<ScheduleEntry>, AppError> {
        let entries = self.api.post(credential, "/schedules/auto", req).await?;
        self.invalidate(&[SCHEDULES]).await;
        Ok(entries)
    }
}
