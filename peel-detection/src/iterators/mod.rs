pub mod peel;
pub mod save_to_file;

pub use peel::{PeelFilter, PeelIter, TransitionIter};
pub use save_to_file::{SavablePoint, SaveToFileFilter};
