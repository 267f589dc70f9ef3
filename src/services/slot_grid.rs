use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::Teacher;

pub const DAYS: [&str; 7] = ["Thứ 2", "Thứ 3", "Thứ 4", "Thứ 5", "Thứ 6", "Thứ 7", "Chủ nhật"];

pub const TIME_BANDS: [&str; 6] = [
    "8:00-10:00",
    "10:00-12:00",
    "13:00-15:00",
    "15:00-17:00",
    "17:00-19:00",
    "19:00-21:00",
];

pub const SLOT_COUNT: usize = DAYS.len() * TIME_BANDS.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub index: usize,
    pub day: &'static str,
    pub band: &'static str,
}

/// The 42 weekly slots, day-major and band-minor.
pub fn weekly_slots() -> Vec<Slot> {
    let mut slots = Vec::with_capacity(SLOT_COUNT);
    let mut index = 0;
    for day in DAYS {
        for band in TIME_BANDS {
            slots.push(Slot { index, day, band });
            index += 1;
        }
    }
    slots
}

pub fn slot(index: i64) -> Option<Slot> {
    let index = usize::try_from(index).ok().filter(|i| *i < SLOT_COUNT)?;
    Some(Slot {
        index,
        day: DAYS[index / TIME_BANDS.len()],
        band: TIME_BANDS[index % TIME_BANDS.len()],
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherAvailability {
    pub teacher_id: String,
    pub teacher_name: String,
    /// `busy[i]` is the state of slot `i`.
    pub busy: Vec<bool>,
    pub busy_count: usize,
    pub free_count: usize,
}

impl TeacherAvailability {
    pub fn is_busy(&self, index: usize) -> bool {
        self.busy.get(index).copied().unwrap_or(false)
    }
}

/// Busy/free flags for one teacher. Indices outside the grid never match a
/// slot, and repeated indices count once.
pub fn availability(teacher: &Teacher) -> TeacherAvailability {
    let busy_set: BTreeSet<i64> = teacher.busy_schedule.iter().copied().collect();
    let busy: Vec<bool> = weekly_slots()
        .iter()
        .map(|slot| busy_set.contains(&(slot.index as i64)))
        .collect();
    let busy_count = busy.iter().filter(|b| **b).count();

    TeacherAvailability {
        teacher_id: teacher.id.clone(),
        teacher_name: teacher.name.clone(),
        busy,
        busy_count,
        free_count: SLOT_COUNT - busy_count,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotGrid {
    pub slots: Vec<Slot>,
    pub teachers: Vec<TeacherAvailability>,
}

pub fn slot_grid(teachers: &[Teacher]) -> SlotGrid {
    SlotGrid {
        slots: weekly_slots(),
        teachers: teachers.iter().map(availability).collect(),
    }
}
