pub mod log_entry;
pub mod status;
pub mod student;
