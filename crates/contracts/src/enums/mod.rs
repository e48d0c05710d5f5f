pub mod language;
pub mod performance_category;

pub use language::Language;
pub use performance_category::PerformanceCategory;
