use crate::auth::Credential;
use crate::error::AppError;
use crate::models::{BusyScheduleUpdate, NewTeacherRequest, Teacher, UpdateTeacherRequest};
use crate::upstream::path_for;

use super::Resources;
use super::classes::CLASSES;

pub const TEACHERS: &str = "teachers";

impl Resources {
    pub async fn list_teachers(&self, credential: &Credential) -> Result<Vec<Teacher>, AppError> {
        self.cached_get(TEACHERS, credential, "/teachers", &[]).await
    }

    pub async fn get_teacher(&self, credential: &Credential, id: &str) -> Result<Teacher, AppError> {
        self.cached_get(TEACHERS, credential, &path_for(&["teachers", id])?, &[])
            .await
    }

    pub async fn create_teacher(
        &self,
        credential: &Credential,
        req: &NewTeacherRequest,
    ) -> Result<Teacher, AppError> {
        let teacher = self.api.post(credential, "/teachers", req).await?;
        self.invalidate(&[TEACHERS]).await;
        Ok(teacher)
    }

    pub async fn update_teacher(
        &self,
        credential: &Credential,
        id: &str,
        req: &UpdateTeacherRequest,
    ) -> Result<Teacher, AppError> {
        let teacher = self
            .api
            .put(credential, &path_for(&["teachers", id])?, req)
            .await?;
        // Class rows embed the teacher name.
        self.invalidate(&[TEACHERS, CLASSES]).await;
        Ok(teacher)
    }

    pub async fn update_busy_schedule(
        &self,
        credential: &Credential,
        id: &str,
        req: &BusyScheduleUpdate,
    ) -> Result<Teacher, AppError> {
        let teacher = self
            .api
            .patch(credential, &path_for(&["teachers", id, "busy-schedule"])?, req)
            .await?;
        self.invalidate(&[TEACHERS]).await;
        Ok(teacher)
    }
}
