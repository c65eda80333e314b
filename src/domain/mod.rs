pub mod error;
pub mod store_config;
pub mod submission;

// Row layout and sanitization for the submissions file
pub mod csv;
