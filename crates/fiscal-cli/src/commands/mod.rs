//! Command implementations.

pub mod extract;
pub mod load;
pub mod run;

pub use self::extract::{execute_extract, extract_with, ExtractSettings};
pub use self::load::{execute_load, load_into};
pub use self::run::execute_run;
