pub mod append_submission;
pub mod form_collector;
pub mod text_content;
