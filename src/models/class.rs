use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::student::Student;

/// Skill category a class trains. Unknown upstream values are kept as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClassType {
    Listening,
    Speaking,
    Reading,
    Writing,
    Grammar,
    Vocabulary,
    Communication,
    Other,
}

impl ClassType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassType::Listening => "listening",
            ClassType::Speaking => "speaking",
            ClassType::Reading => "reading",
            ClassType::Writing => "writing",
            ClassType::Grammar => "grammar",
            ClassType::Vocabulary => "vocabulary",
            ClassType::Communication => "communication",
            ClassType::Other => "other",
        }
    }

    /// Display label, also matched by list search.
    pub fn label(&self) -> &'static str {
        match self {
            ClassType::Listening => "Nghe",
            ClassType::Speaking => "Nói",
            ClassType::Reading => "Đọc",
            ClassType::Writing => "Viết",
            ClassType::Grammar => "Ngữ pháp",
            ClassType::Vocabulary => "Từ vựng",
            ClassType::Communication => "Giao tiếp",
            ClassType::Other => "Khác",
        }
    }
}

impl From<String> for ClassType {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "listening" => ClassType::Listening,
            "speaking" => ClassType::Speaking,
            "reading" => ClassType::Reading,
            "writing" => ClassType::Writing,
            "grammar" => ClassType::Grammar,
            "vocabulary" => ClassType::Vocabulary,
            "communication" => ClassType::Communication,
            _ => ClassType::Other,
        }
    }
}

impl From<ClassType> for String {
    fn from(class_type: ClassType) -> Self {
        class_type.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub student_count: u32,
    #[serde(default)]
    pub lessons_per_week: u32,
    pub class_type: ClassType,
    #[serde(default)]
    pub teacher: Option<TeacherRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<Student>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClassRequest {
    pub name: String,
    pub lessons_per_week: u32,
    pub class_type: Option<ClassType>,
    #[serde(default)]
    pub teacher_id: Option<String>,
    /// Ask the server to place the class into free slots right after creation.
    #[serde(default)]
    pub auto_schedule: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub lessons_per_week: Option<u32>,
    pub class_type: Option<ClassType>,
    pub teacher_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentRequest {
    pub student_id: String,
}
