pub mod document;
pub mod write_result;

pub use write_result::*;
