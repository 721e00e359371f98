pub mod record;
pub mod topic;

pub use record::PromptRecord;
pub use topic::Topic;
