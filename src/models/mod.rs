pub mod app;
pub mod events;
pub mod storage;

pub use app::*;
pub use events::*;
pub use storage::*;
