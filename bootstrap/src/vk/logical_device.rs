use std::sync::Arc;

use crate::traits::BorrowHandle;
use crate::vk::{Driver, Instance, PhysicalDevice, Queue};

/// A logical Vulkan device.
///
/// The device is created with a single queue, drawn from the graphics family.
pub struct LogicalDevice<D : Driver> {
    handle : D::Device,
    pub context : Arc<Instance<D>>,
    pub physical_device : PhysicalDevice<D>,
    graphics_queue : Queue<D>,
}

impl<D : Driver> LogicalDevice<D> {
    pub fn new(context : &Arc<Instance<D>>,
        device : D::Device,
        physical_device : PhysicalDevice<D>,
        graphics_queue : Queue<D>,
    ) -> Self {
        Self {
            handle : device,
            context : context.clone(),
            physical_device,
            graphics_queue,
        }
    }

    #[inline] pub fn graphics_queue(&self) -> &Queue<D> { &self.graphics_queue }
}

impl<D : Driver> BorrowHandle for LogicalDevice<D> {
    type Target = D::Device;

    fn handle(&self) -> &D::Device { &self.handle }
}

impl<D : Driver> Drop for LogicalDevice<D> {
    fn drop(&mut self) {
        log::debug!("Destroying logical device");
        self.context.driver().destroy_device(&mut self.handle);
    }
}
