pub mod sample;
pub mod summary;
