mod handlers;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::{delete, post, put};
use axum::{Router, routing::get};

use crate::auth::{Credential, PermissionSet};
use crate::error::AppError;
use crate::models::Profile;
use crate::nav;
use crate::state::AppState;

use handlers::*;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/me/menu", get(my_menu))
        .route("/classes", get(list_classes).post(create_class))
        .route(
            "/classes/{id}",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route("/classes/{id}/students", post(add_class_student))
        .route(
            "/classes/{id}/students/{student_id}",
            delete(remove_class_student),
        )
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/teachers", get(list_teachers).post(create_teacher))
        .route("/teachers/slot-grid", get(teacher_slot_grid))
        .route("/teachers/{id}", get(get_teacher).put(update_teacher))
        .route("/teachers/{id}/busy-schedule", put(update_busy_schedule))
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/schedules", get(list_schedules))
        .route("/schedules/auto", post(auto_schedule))
        .route("/schedules/makeup", post(create_makeup))
        .route("/schedules/makeup/groups", get(makeup_groups))
        .route("/wallets/summary", get(wallet_summary))
        .route("/exports/{kind}", get(export))
        .with_state(state)
}

/// The caller's credential and capabilities, resolved once per request.
///
/// Extraction fails with 401 when no token is present and 403 when the
/// permission set does not cover the requested path.
pub struct AuthContext {
    pub credential: Credential,
    pub profile: Profile,
    pub permissions: PermissionSet,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let credential = Credential::from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let (profile, permissions) = state.resources.permissions(&credential).await?;
        nav::guard(&permissions, parts.uri.path())?;

        Ok(Self {
            credential,
            profile,
            permissions,
        })
    }
}
