use std::collections::HashMap;

use serde::Serialize;

use crate::models::MakeupRecord;
use crate::services::slot_grid::{self, Slot};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeupStudent {
    pub fullname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeupGroup {
    pub teacher_id: String,
    pub teacher_name: String,
    pub slot_time: i64,
    pub slot: Option<Slot>,
    pub students: Vec<MakeupStudent>,
}

/// Collapses attendance rows into one group per `(teacher_id, slot_time)`.
///
/// Groups keep the order in which their key first appears. Students are
/// appended as-is; a student listed twice for the same key appears twice.
pub fn group_makeup_records(records: &[MakeupRecord]) -> Vec<MakeupGroup> {
    let mut groups: Vec<MakeupGroup> = Vec::new();
    let mut positions: HashMap<(&str, i64), usize> = HashMap::new();

    for record in records {
        let key = (record.teacher_id.as_str(), record.slot_time);
        let position = *positions.entry(key).or_insert_with(|| {
            groups.push(MakeupGroup {
                teacher_id: record.teacher_id.clone(),
                teacher_name: record.teacher_name.clone(),
                slot_time: record.slot_time,
                slot: slot_grid::slot(record.slot_time),
                students: Vec::new(),
            });
            groups.len() - 1
        });

        groups[position].students.push(MakeupStudent {
            fullname: record.fullname.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
        });
    }

    groups
}
