pub mod task;
pub mod project;
pub mod store;
pub mod view;
pub mod config;

pub use task::*;
pub use project::*;
pub use store::*;
pub use view::*;
pub use config::*;
