pub mod cache;
pub mod kitab;
