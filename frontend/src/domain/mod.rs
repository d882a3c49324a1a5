pub mod field_errors;
pub mod pricing;

pub use field_errors::{field_messages, joined_field_error};
pub use pricing::compute_total;
