//! Engine session: controller and time budget computation.

mod controller;
mod time;

pub use controller::{EngineController, ENGINE_NAME, ENGINE_VERSION};
pub use time::compute_time_budget;
