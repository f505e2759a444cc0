pub mod publish;
pub mod upload;

pub use publish::{PublishOutcome, Publisher};
pub use upload::UploadService;
