use crate::auth::Credential;
use crate::error::AppError;
use crate::models::{Course, NewCourseRequest, UpdateCourseRequest};
use crate::upstream::path_for;

use super::Resources;

pub const COURSES: &str = "courses";

impl Resources {
    pub async fn list_courses(&self, credential: &Credential) -> Result<Vec<Course>, AppError> {
        self.cached_get(COURSES, credential, "/courses", &[]).await
    }

    pub async fn get_course(&self, credential: &Credential, id: &str) -> Result<Course, AppError> {
        self.cached_get(COURSES, credential, &path_for(&["courses", id])?, &[])
            .await
    }

    pub async fn create_course(
        &self,
        credential: &Credential,
        req: &NewCourseRequest,
    ) -> Result<Course, AppError> {
        let course = self.api.post(credential, "/courses", req).await?;
        self.invalidate(&[COURSES]).await;
        Ok(course)
    }

    pub async fn update_course(
        &self,
        credential: &Credential,
        id: &str,
        req: &UpdateCourseRequest,
    ) -> Result<Course, AppError> {
        let course = self
            .api
            .put(credential, &path_for(&["courses", id])?, req)
            .await?;
        self.invalidate(&[COURSES]).await;
        Ok(course)
    }

    pub async fn delete_course(&self, credential: &Credential, id: &str) -> Result<(), AppError> {
        self.api.delete(credential, &path_for(&["courses", id])?).await?;
        self.invalidate(&[COURSES]).await;
        Ok(())
    }
}
