//! Scene engine: the controller and frame loop, the per-frame stage,
//! the depth-aware backdrop and the spawn-column pool

pub mod background;
mod controller;
mod pool;
mod stage;

pub use background::{is_visible, Background, FAR_DEPTH, TREE_DEPTH};
pub use controller::SceneController;
pub use pool::{IndexPool, COLUMN_COUNT};
pub use stage::Stage;
