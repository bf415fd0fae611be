pub mod student;
pub mod team;

pub use student::{CourseCategory, Student, StudentRow};
pub use team::{Team, TeamRow, TeamStatus};
