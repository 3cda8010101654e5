// Session lifecycle: registry, text input (typed or uploaded), transcript, downloads.

pub mod exports;
pub mod handlers;
pub mod store;
