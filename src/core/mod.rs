pub mod error;
pub mod matrix;
pub mod ordering;
pub mod types;
