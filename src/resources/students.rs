use crate::auth::Credential;
use crate::error::AppError;
use crate::models::{NewStudentRequest, Student, UpdateStudentRequest};
use crate::upstream::path_for;

use super::Resources;
use super::classes::CLASSES;

pub const STUDENTS: &str = "students";

impl Resources {
    pub async fn list_students(&self, credential: &Credential) -> Result<Vec<Student>, AppError> {
        self.cached_get(STUDENTS, credential, "/students", &[]).await
    }

    pub async fn get_student(&self, credential: &Credential, id: &str) -> Result<Student, AppError> {
        self.cached_get(STUDENTS, credential, &path_for(&["students", id])?, &[])
            .await
    }

    pub async fn create_student(
        &self,
        credential: &Credential,
        req: &NewStudentRequest,
    ) -> Result<Student, AppError> {
        let student = self.api.post(credential, "/students", req).await?;
        self.invalidate(&[STUDENTS]).await;
        Ok(student)
    }

    pub async fn update_student(
        &self,
        credential: &Credential,
        id: &str,
        req: &UpdateStudentRequest,
    ) -> Result<Student, AppError> {
        let student = self
            .api
            .put(credential, &path_for(&["students", id])?, req)
            .await?;
        self.invalidate(&[STUDENTS]).await;
        Ok(student)
    }

    pub async fn delete_student(&self, credential: &Credential, id: &str) -> Result<(), AppError> {
        self.api.delete(credential, &path_for(&["students", id])?).await?;
        self.invalidate(&[STUDENTS, CLASSES]).await;
        Ok(())
    }
}
