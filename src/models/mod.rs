pub mod class;
pub mod course;
pub mod profile;
pub mod schedule;
pub mod student;
pub mod teacher;
pub mod wallet;

pub use class::{AddStudentRequest, ClassData, ClassType, NewClassRequest, TeacherRef, UpdateClassRequest};
pub use course::{Course, NewCourseRequest, UpdateCourseRequest};
pub use profile::Profile;
pub use schedule::{AutoScheduleRequest, MakeupRecord, NewMakeupRequest, ScheduleEntry, ScheduleQuery};
pub use student::{NewStudentRequest, Student, UpdateStudentRequest};
pub use teacher::{BusyScheduleUpdate, NewTeacherRequest, Teacher, UpdateTeacherRequest};
pub use wallet::{WalletDelta, WalletDeltaSummary, WalletPeriod, WalletType};
