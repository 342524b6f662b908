pub mod model;
pub mod selector;

pub use model::{Task, TaskType};
pub use selector::TaskSelector;
