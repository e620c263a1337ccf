pub mod backup;
pub mod log;
pub mod mark;
pub mod report;
pub mod resolver;
pub mod roster;
pub mod sources;
pub mod student;
pub mod summary;
