pub mod extract;
pub mod grade;
pub mod validate;
