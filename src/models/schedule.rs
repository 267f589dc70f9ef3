use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub class_id: String,
    pub class_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub lesson: u32,
    pub slot_time: i64,
    #[serde(default)]
    pub is_makeup: bool,
    #[serde(default)]
    pub note: Option<String>,
}

/// One student's attendance row for a makeup session, as the server flattens it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeupRecord {
    pub teacher_id: String,
    pub teacher_name: String,
    pub slot_time: i64,
    pub fullname: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuery {
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMakeupRequest {
    pub class_id: String,
    pub teacher_id: String,
    pub lesson: u32,
    pub slot_time: Option<i64>,
    #[serde(default)]
    pub student_ids: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoScheduleRequest {
    pub class_id: String,
}
