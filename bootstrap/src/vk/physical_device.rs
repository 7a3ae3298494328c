use std::sync::{Arc, Weak};

use ash::vk;

use crate::traits::{BorrowHandle, Handle};
use crate::vk::{ContextError, DeviceInfo, Driver, Instance, LogicalDevice, Queue, QueueFamily, QueueFamilyIndices};

/// A GPU visible to an [`Instance`]. Physical devices are enumerated, never owned.
pub struct PhysicalDevice<D : Driver> {
    handle : D::PhysicalDevice,
    context : Weak<Instance<D>>,
    name : String,
    pub queue_families : Vec<QueueFamily>,
}

impl<D : Driver> Clone for PhysicalDevice<D> {
    fn clone(&self) -> Self {
        Self {
            handle : self.handle,
            context : self.context.clone(),
            name : self.name.clone(),
            queue_families : self.queue_families.clone(),
        }
    }
}

impl<D : Driver> Handle for PhysicalDevice<D> {
    type Target = D::PhysicalDevice;

    fn handle(&self) -> D::PhysicalDevice { self.handle }
}

impl<D : Driver> PhysicalDevice<D> {
    #[inline] pub fn context(&self) -> &Weak<Instance<D>> { &self.context }
    #[inline] pub fn name(&self) -> &str { &self.name }

    /// Resolves the queue families this device offers for each required capability.
    pub fn queue_family_indices(&self) -> QueueFamilyIndices {
        QueueFamilyIndices::find(&self.queue_families)
    }

    /// Creates a logical device with a single queue taken from the graphics family.
    ///
    /// # Arguments
    ///
    /// * `instance` - The instance this device was enumerated from.
    /// * `indices` - Resolved queue families. Must be complete.
    /// * `layers` - The layers the instance was created with. Passed through for older loaders.
    ///
    /// # Errors
    ///
    /// * [`ContextError::NoSuitableDeviceFound`] if `indices` has no graphics family.
    /// * [`ContextError::LogicalDeviceCreationFailed`] if [`vkCreateDevice`](https://registry.khronos.org/vulkan/specs/1.3-extensions/man/html/vkCreateDevice.html) fails.
    pub fn create_logical_device(&self,
        instance : &Arc<Instance<D>>,
        indices : &QueueFamilyIndices,
        layers : &[std::ffi::CString],
    ) -> Result<LogicalDevice<D>, ContextError> {
        let family = indices.graphics
            .and_then(|index| self.queue_families.iter().find(|family| family.index() == index))
            .ok_or(ContextError::NoSuitableDeviceFound)?;

        let queue_priorities = [1.0_f32];
        let device_info = DeviceInfo {
            queue_family_index : family.index(),
            queue_priorities : &queue_priorities,
            features : vk::PhysicalDeviceFeatures::default(),
            layers,
        };

        let driver = instance.driver();
        let device = driver.create_device(instance.handle(), self.handle, &device_info)
            .map_err(ContextError::LogicalDeviceCreationFailed)?;

        let graphics_queue = Queue::new(family, 0, &device, driver);

        Ok(LogicalDevice::new(instance, device, self.clone(), graphics_queue))
    }

    /// Creates a new [`PhysicalDevice`].
    ///
    /// # Arguments
    ///
    /// * `device` - The native physical device.
    /// * `instance` - The instance that enumerated it.
    pub fn new(device : D::PhysicalDevice, instance : &Arc<Instance<D>>) -> Self {
        let driver = instance.driver();

        let queue_families = driver.queue_family_properties(instance.handle(), device)
            .into_iter()
            .enumerate()
            .map(|(index, properties)| QueueFamily::new(index as u32, properties))
            .collect::<Vec<_>>();

        Self {
            handle : device,
            context : Arc::downgrade(instance),
            name : driver.physical_device_name(instance.handle(), device),
            queue_families,
        }
    }
}
