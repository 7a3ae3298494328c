#[macro_use]
mod macros;

pub mod traits;
pub mod vk;
pub mod window;
pub mod logging;
pub mod application;

pub use application::*;
pub use window::*;
