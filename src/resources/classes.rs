use crate::auth::Credential;
use crate::error::AppError;
use crate::models::{AddStudentRequest, ClassData, NewClassRequest, UpdateClassRequest};
use crate::upstream::path_for;

use super::Resources;
use super::schedules::SCHEDULES;
use super::students::STUDENTS;

pub const CLASSES: &str = "classes";

impl Resources {
    pub async fn list_classes(&self, credential: &Credential) -> Result<Vec<ClassData>, AppError> {
        self.cached_get(CLASSES, credential, "/classes", &[]).await
    }

    pub async fn get_class(&self, credential: &Credential, id: &str) -> Result<ClassData, AppError> {
        self.cached_get(CLASSES, credential, &path_for(&["classes", id])?, &[])
            .await
    }

    pub async fn create_class(
        &self,
        credential: &Credential,
        req: &NewClassRequest,
    ) -> Result<ClassData, AppError> {
        let class: ClassData = self.api.post(credential, "/classes", req).await?;
        let mut affected = vec![CLASSES];
        if req.auto_schedule {
            affected.push(SCHEDULES);
        }
        self.invalidate(&affected).await;
        Ok(class)
    }

    pub async fn update_class(
        &self,
        credential: &Credential,
        id: &str,
        req: &UpdateClassRequest,
    ) -> Result<ClassData, AppError> {
        let class = self
            .api
            .put(credential, &path_for(&["classes", id])?, req)
            .await?;
        self.invalidate(&[CLASSES, SCHEDULES]).await;
        Ok(class)
    }

    pub async fn delete_class(&self, credential: &Credential, id: &str) -> Result<(), AppError> {
        self.api.delete(credential, &path_for(&["classes", id])?).await?;
        self.invalidate(&[CLASSES, SCHEDULES]).await;
        Ok(())
    }

    pub async fn add_student_to_class(
        &self,
        credential: &Credential,
        class_id: &str,
        student_id: &str,
    ) -> Result<ClassData, AppError> {
        let body = AddStudentRequest {
            student_id: student_id.to_string(),
        };
        let class = self
            .api
            .post(credential, &path_for(&["classes", class_id, "students"])?, &body)
            .await?;
        self.invalidate(&[CLASSES, STUDENTS]).await;
        Ok(class)
    }

    pub async fn remove_student_from_class(
        &self,
        credential: &Credential,
        class_id: &str,
        student_id: &str,
    ) -> Result<(), AppError> {
        self.api
            .delete(
                credential,
                &path_for(&["classes", class_id, "students", student_id])?,
            )
            .await?;
        self.invalidate(&[CLASSES, STUDENTS]).await;
        Ok(())
    }
}
