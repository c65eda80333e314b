pub mod use_cases;

pub use use_cases::append_submission::AppendSubmissionUseCase;
pub use use_cases::form_collector::{collect_submission, FormSnapshot};
pub use use_cases::text_content::{to_paragraphs, TextAssetLoader};
