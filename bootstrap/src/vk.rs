mod error;
mod driver;
mod native;
mod extensions;
mod layers;
mod debug;
mod instance;
mod physical_device;
mod queue;
mod logical_device;
mod context;

#[cfg(test)]
pub(crate) mod fake;

pub use error::*;
pub use driver::*;
pub use native::*;
pub use extensions::*;
pub use layers::*;
pub use debug::*;
pub use instance::*;
pub use physical_device::*;
pub use queue::*;
pub use logical_device::*;
pub use context::*;
