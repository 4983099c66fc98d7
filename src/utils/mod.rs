pub mod rfc3339;
pub mod text;
