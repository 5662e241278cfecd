pub mod dates;
pub mod errors;
pub mod log;
pub mod metrics;
pub mod test_utils;
pub mod validators;
