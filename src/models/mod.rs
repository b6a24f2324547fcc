pub mod employee;
pub mod payload;
