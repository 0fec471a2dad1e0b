pub mod eval;
pub mod train;
pub mod visualize;

pub use eval::{EvalConfig, EvalMode, EvalReport};
pub use train::{TrainConfig, TrainMode};
pub use visualize::VisualizeMode;
