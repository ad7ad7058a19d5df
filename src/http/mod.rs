pub mod pool;
pub mod submitter;

pub use submitter::HttpSubmitter;
