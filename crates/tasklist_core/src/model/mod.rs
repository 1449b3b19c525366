mod task;

pub use task::{Category, Priority, Task};
