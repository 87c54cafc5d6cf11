pub mod records;
pub mod reports;
