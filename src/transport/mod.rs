mod r#trait;

pub use r#trait::{SubmitResponse, Submitter};
