pub mod fare;
pub mod search;
