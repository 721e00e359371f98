// Topic distribution: spreads prompt records over one markdown file per topic.
// Output files are append-only; a duplicate guard keeps reruns from repeating blocks.

pub mod topics;
pub mod writer;

pub use topics::{load_topic_list, topics_from_dir};
pub use writer::{materialize, DuplicateGuard, TopicStatus};
