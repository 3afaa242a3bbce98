pub mod ports;
pub mod transaction;
pub mod use_cases;
