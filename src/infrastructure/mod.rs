pub mod blob_store;
pub mod config;
pub mod intake_client;
