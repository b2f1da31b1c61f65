pub mod answer_table;
pub mod catalog;
pub mod classifier;
pub mod metrics;
pub mod providers;
pub mod resolver;

pub use answer_table::AnswerTable;
pub use classifier::RoleClassifier;
pub use resolver::{AnswerResolver, AnswerSource, Resolution, FALLBACK_ANSWER};
