pub mod items;
pub mod progress;
pub mod scenario;
pub mod simulate;
pub mod task;
