pub mod controller;
pub mod memo;
pub mod state;
pub mod view;

pub use controller::{BoardController, BoardView};
pub use state::{BoardState, Phase, Theme};
pub use view::{FilterKey, SortKey};
