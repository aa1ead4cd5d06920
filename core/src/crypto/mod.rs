
pub mod types;
pub mod ctr_mode;

pub use types::*;
pub use ctr_mode::*;
