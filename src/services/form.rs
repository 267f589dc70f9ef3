use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{
    AutoScheduleRequest, NewClassRequest, NewCourseRequest, NewMakeupRequest, NewStudentRequest,
    NewTeacherRequest, UpdateClassRequest, UpdateCourseRequest, UpdateStudentRequest,
    UpdateTeacherRequest,
};

/// How long an edit view shows its success message before leaving.
pub const EDIT_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// A writable entity draft that knows which required fields are still empty.
pub trait Draft {
    fn missing_fields(&self) -> Vec<&'static str>;
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn blank_opt(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(blank)
}

/// `Some("")` on an update would clear a required field.
fn cleared(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(blank)
}

impl Draft for NewClassRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("name");
        }
        if self.lessons_per_week == 0 {
            missing.push("lessonsPerWeek");
        }
        if self.class_type.is_none() {
            missing.push("classType");
        }
        missing
    }
}

impl Draft for UpdateClassRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if cleared(&self.name) {
            missing.push("name");
        }
        if self.lessons_per_week == Some(0) {
            missing.push("lessonsPerWeek");
        }
        missing
    }
}

impl Draft for NewCourseRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("name");
        }
        if self.total_lessons == 0 {
            missing.push("totalLessons");
        }
        missing
    }
}

impl Draft for UpdateCourseRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        if cleared(&self.name) { vec!["name"] } else { Vec::new() }
    }
}

impl Draft for NewStudentRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.username) {
            missing.push("username");
        }
        if blank(&self.fullname) {
            missing.push("fullname");
        }
        missing
    }
}

impl Draft for UpdateStudentRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        if cleared(&self.fullname) { vec!["fullname"] } else { Vec::new() }
    }
}

impl Draft for NewTeacherRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("name");
        }
        if blank_opt(&self.email) && blank_opt(&self.phone) {
            missing.push("email");
        }
        missing
    }
}

impl Draft for UpdateTeacherRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        if cleared(&self.name) { vec!["name"] } else { Vec::new() }
    }
}

impl Draft for NewMakeupRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.class_id) {
            missing.push("classId");
        }
        if blank(&self.teacher_id) {
            missing.push("teacherId");
        }
        if self.slot_time.is_none() {
            missing.push("slotTime");
        }
        missing
    }
}

impl Draft for AutoScheduleRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        if blank(&self.class_id) { vec!["classId"] } else { Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmitState {
    Idle,
    Submitting,
    Success,
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { return_to: String },
}

/// What the view should do after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Reset,
    Navigate { to: String, after_ms: u64 },
}

/// Local draft of a create or edit view plus its submission state.
///
/// `Idle -> Submitting -> Success | Error -> Idle`. A draft with missing
/// required fields is never submitted, and a failed submit keeps the draft.
#[derive(Debug)]
pub struct FormSession<D> {
    draft: D,
    mode: FormMode,
    state: SubmitState,
}

impl<D: Draft + Clone + Default> FormSession<D> {
    pub fn new(draft: D, mode: FormMode) -> Self {
        Self {
            draft,
            mode,
            state: SubmitState::Idle,
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn can_submit(&self) -> bool {
        self.state != SubmitState::Submitting && self.draft.missing_fields().is_empty()
    }

    /// Runs `mutation` once with a copy of the draft.
    pub async fn submit<T, F, Fut>(&mut self, mutation: F) -> Result<(T, SubmitOutcome), AppError>
    where
        F: FnOnce(D) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let missing = self.draft.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(
                missing.into_iter().map(str::to_string).collect(),
            ));
        }
        if self.state == SubmitState::Submitting {
            return Err(AppError::BadRequest("Submission already in progress".to_string()));
        }

        self.state = SubmitState::Submitting;
        match mutation(self.draft.clone()).await {
            Ok(value) => {
                self.state = SubmitState::Success;
                let outcome = match &self.mode {
                    FormMode::Create => {
                        self.draft = D::default();
                        SubmitOutcome::Reset
                    }
                    FormMode::Edit { return_to } => SubmitOutcome::Navigate {
                        to: return_to.clone(),
                        after_ms: EDIT_REDIRECT_DELAY.as_millis() as u64,
                    },
                };
                info!("form submitted: {:?}", outcome);
                Ok((value, outcome))
            }
            Err(e) => {
                warn!("form submission failed: {}", e);
                self.state = SubmitState::Error {
                    message: e.user_message(),
                };
                Err(e)
            }
        }
    }

    /// Clears a success or error state once it has been shown.
    pub fn acknowledge(&mut self) {
        if self.state != SubmitState::Submitting {
            self.state = SubmitState::Idle;
        }
    }
}
