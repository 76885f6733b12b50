pub mod analytics;
pub mod classes;
pub mod relationships;
pub mod students;
pub mod teachers;
