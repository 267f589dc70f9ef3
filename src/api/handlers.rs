use std::future::Future;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::*;
use crate::nav::{self, MenuItem};
use crate::resources::exports::ExportFormat;
use crate::resources::ExportKind;
use crate::services::form::{Draft, FormMode, FormSession, SubmitOutcome};
use crate::services::listing::{ListQuery, Page};
use crate::services::makeup::{MakeupGroup, group_makeup_records};
use crate::services::reconciliation::{WalletReport, reconcile};
use crate::services::slot_grid::{SLOT_COUNT, SlotGrid, slot_grid};
use crate::services::filter_by_term;
use crate::state::AppState;

use super::AuthContext;

#[derive(Debug, Serialize)]
pub struct SubmitResponse<T> {
    pub data: T,
    pub outcome: SubmitOutcome,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub profile: Profile,
    pub permissions: Vec<crate::auth::Permission>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache_entries: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

async fn submit_form<D, T, F, Fut>(
    draft: D,
    mode: FormMode,
    mutation: F,
) -> Result<Json<SubmitResponse<T>>, AppError>
where
    D: Draft + Clone + Default,
    F: FnOnce(D) -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut form = FormSession::new(draft, mode);
    let (data, outcome) = form.submit(mutation).await?;
    Ok(Json(SubmitResponse { data, outcome }))
}

fn edit_mode(return_to: &str) -> FormMode {
    FormMode::Edit {
        return_to: return_to.to_string(),
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache_entries: state.resources.cache().len().await,
    })
}

pub async fn me(auth: AuthContext) -> Json<MeResponse> {
    Json(MeResponse {
        profile: auth.profile,
        permissions: auth.permissions.iter().collect(),
    })
}

pub async fn my_menu(auth: AuthContext) -> Json<Vec<MenuItem>> {
    Json(nav::menu_for(&auth.permissions))
}

// Classes

pub async fn list_classes(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<ListQuery>,
) -> Result<Json<Page<ClassData>>, AppError> {
    let classes = state.resources.list_classes(&auth.credential).await?;
    Ok(Json(params.apply(&classes)))
}

pub async fn get_class(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<ClassData>, AppError> {
    let class = state.resources.get_class(&auth.credential, &id).await?;
    Ok(Json(class))
}

pub async fn create_class(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<NewClassRequest>,
) -> Result<Json<SubmitResponse<ClassData>>, AppError> {
    let resources = &state.resources;
    let credential = &auth.credential;
    submit_form(req, FormMode::Create, |draft| async move {
        resources.create_class(credential, &draft).await
    })
    .await
}

pub async fn update_class(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(req): Json<UpdateClassRequest>,
) -> Result<Json<SubmitResponse<ClassData>>, AppError> {
    let resources = &state.resources;
    let credential = &auth.credential;
    let id = id.as_str();
    submit_form(req, edit_mode("/classes"), |draft| async move {
        resources.update_class(credential, id, &draft).await
    })
    .await
}

pub async fn delete_class(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.resources.delete_class(&auth.credential, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_class_student(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(req): Json<AddStudentRequest>,
) -> Result<Json<ClassData>, AppError> {
    if req.student_id.trim().is_empty() {
        return Err(AppError::Validation(vec!["studentId".to_string()]));
    }
    let class = state
        .resources
        .add_student_to_class(&auth.credential, &id, &req.student_id)
        .await?;
    Ok(Json(class))
}

pub async fn remove_class_student(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((id, student_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state
        .resources
        .remove_student_from_class(&auth.credential, &id, &student_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Courses

pub async fn list_courses(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<ListQuery>,
) -> Result<Json<Page<Course>>, AppError> {
    let courses = state.resources.list_courses(&auth.credential).await?;
    Ok(Json(params.apply(&courses)))
}

pub async fn get_course(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = state.resources.get_course(&auth.credential, &id).await?;
    Ok(Json(course))
}

pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<NewCourseRequest>,
) -> Result<Json<SubmitResponse<Course>>, AppError> {
    let resources = &state.resources;
    let credential = &auth.credential;
    submit_form(req, FormMode::Create, |draft| async move {
        resources.create_course(credential, &draft).await
    })
    .await
}

pub async fn update_course(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<SubmitResponse<Course>>, AppError> {
    let resources = &state.resources;
    let credential = &auth.credential;
    let id = id.as_str();
    submit_form(req, edit_mode("/courses"), |draft| async move {
        resources.update_course(credential, id, &draft).await
    })
    .await
}

pub async fn delete_course(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.resources.delete_course(&auth.credential, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Teachers

pub async fn list_teachers(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<ListQuery>,
) -> Result<Json<Page<Teacher>>, AppError> {
    let teachers = state.resources.list_teachers(&auth.credential).await?;
    Ok(Json(params.apply(&teachers)))
}

pub async fn get_teacher(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = state.resources.get_teacher(&auth.credential, &id).await?;
    Ok(Json(teacher))
}

pub async fn teacher_slot_grid(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<ListQuery>,
) -> Result<Json<SlotGrid>, AppError> {
    let teachers = state.resources.list_teachers(&auth.credential).await?;
    let teachers = filter_by_term(&teachers, params.search.as_deref().unwrap_or(""));
    Ok(Json(slot_grid(&teachers)))
}

pub async fn create_teacher(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<NewTeacherRequest>,
) -> Result<Json<SubmitResponse<Teacher>>, AppError> {
    let resources = &state.resources;
    let credential = &auth.credential;
    submit_form(req, FormMode::Create, |draft| async move {
        resources.create_teacher(credential, &draft).await
    })
    .await
}

pub async fn update_teacher(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(req): Json<UpdateTeacherRequest>,
) -> Result<Json<SubmitResponse<Teacher>>, AppError> {
    let resources = &state.resources;
    let credential = &auth.credential;
    let id = id.as_str();
    submit_form(req, edit_mode("/teachers"), |draft| async move {
        resources.update_teacher(credential, id, &draft).await
    })
    .await
}

pub async fn update_busy_schedule(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(mut req): Json<BusyScheduleUpdate>,
) -> Result<Json<Teacher>, AppError> {
    if let Some(bad) = req
        .busy_schedule
        .iter()
        .find(|i| !(0..SLOT_COUNT as i64).contains(*i))
    {
        return Err(AppError::BadRequest(format!(
            "Slot index out of range: {}",
            bad
        )));
    }
    req.busy_schedule.sort_unstable();
    req.busy_schedule.dedup();

    let teacher = state
        .resources
        .update_busy_schedule(&auth.credential, &id, &req)
        .await?;
    Ok(Json(teacher))
}

// Students

pub async fn list_students(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<ListQuery>,
) -> Result<Json<Page<Student>>, AppError> {
    let students = state.resources.list_students(&auth.credential).await?;
    Ok(Json(params.apply(&students)))
}

pub async fn get_student(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let student = state.resources.get_student(&auth.credential, &id).await?;
    Ok(Json(student))
}

pub async fn create_student(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<NewStudentRequest>,
) -> Result<Json<SubmitResponse<Student>>, AppError> {
    let resources = &state.resources;
    let credential = &auth.credential;
    submit_form(req, FormMode::Create, |draft| async move {
        resources.create_student(credential, &draft).await
    })
    .await
}

pub async fn update_student(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<SubmitResponse<Student>>, AppError> {
    let resources = &state.resources;
    let credential = &auth.credential;
    let id = id.as_str();
    submit_form(req, edit_mode("/students"), |draft| async move {
        resources.update_student(credential, id, &draft).await
    })
    .await
}

pub async fn delete_student(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.resources.delete_student(&auth.credential, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Schedules

pub async fn list_schedules(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(filter): Query<ScheduleQuery>,
) -> Result<Json<Vec<ScheduleEntry>>, AppError> {
    let entries = state
        .resources
        .list_schedules(&auth.credential, &filter)
        .await?;
    Ok(Json(entries))
}

pub async fn auto_schedule(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<AutoScheduleRequest>,
) -> Result<Json<SubmitResponse<Vec<ScheduleEntry>>>, AppError> {
    let resources = &state.resources;
    let credential = &auth.credential;
    submit_form(req, edit_mode("/schedules"), |draft| async move {
        resources.auto_schedule(credential, &draft).await
    })
    .await
}

pub async fn create_makeup(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<NewMakeupRequest>,
) -> Result<Json<SubmitResponse<ScheduleEntry>>, AppError> {
    let resources = &state.resources;
    let credential = &auth.credential;
    submit_form(req, FormMode::Create, |draft| async move {
        resources.create_makeup(credential, &draft).await
    })
    .await
}

pub async fn makeup_groups(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<MakeupGroup>>, AppError> {
    let records = state.resources.list_makeup_records(&auth.credential).await?;
    Ok(Json(group_makeup_records(&records)))
}

// Wallets & exports

pub async fn wallet_summary(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(period): Query<WalletPeriod>,
) -> Result<Json<WalletReport>, AppError> {
    if let (Some(from), Some(to)) = (period.from, period.to) {
        if from > to {
            return Err(AppError::BadRequest("`from` must not be after `to`".to_string()));
        }
    }
    let summary = state
        .resources
        .wallet_delta_summary(&auth.credential, &period)
        .await?;
    Ok(Json(reconcile(&summary)))
}

pub async fn export(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(kind): Path<String>,
    Query(params): Query<ExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let kind: ExportKind = kind.parse()?;
    let download = state
        .resources
        .export(&auth.credential, kind, params.format)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, download.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download.filename),
            ),
        ],
        download.bytes,
    ))
}
