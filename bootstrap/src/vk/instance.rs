use std::sync::Arc;

use crate::traits::BorrowHandle;
use crate::vk::{ContextError, Driver, InstanceInfo, PhysicalDevice, QueueFamilyIndices};

/// A Vulkan instance.
///
/// Every object created from the instance holds a strong reference to it, so the
/// instance is always the last thing destroyed.
pub struct Instance<D : Driver> {
    handle : D::Instance,
    driver : D,
}

impl<D : Driver> BorrowHandle for Instance<D> {
    type Target = D::Instance;

    fn handle(&self) -> &D::Instance { &self.handle }
}

impl<D : Driver> Drop for Instance<D> {
    fn drop(&mut self) {
        log::debug!("Destroying instance");
        self.driver.destroy_instance(&mut self.handle);
    }
}

impl<D : Driver> Instance<D> {
    #[inline] pub fn driver(&self) -> &D { &self.driver }

    /// Creates a new [`Instance`].
    ///
    /// Once the instance exists, every instance extension supported by the host is logged.
    ///
    /// # Arguments
    ///
    /// * `driver` - The driver performing native calls. The instance takes ownership of it.
    /// * `info` - Application metadata, extensions, layers and the messenger to chain, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::InstanceCreationFailed`] if [`vkCreateInstance`](https://registry.khronos.org/vulkan/specs/1.3-extensions/man/html/vkCreateInstance.html) fails.
    pub fn new(driver : D, info : &InstanceInfo) -> Result<Arc<Self>, ContextError> {
        let handle = driver.create_instance(info)
            .map_err(ContextError::InstanceCreationFailed)?;

        match driver.enumerate_instance_extensions() {
            Ok(extensions) => {
                log::info!("Available extensions:");
                for extension in &extensions {
                    log::info!("\t# {}", extension.to_string_lossy());
                }
            },
            Err(err) => log::warn!("Failed to enumerate instance extensions: {err}"),
        }

        Ok(Arc::new(Self {
            handle,
            driver,
        }))
    }

    /// Returns all physical devices of this instance, in enumeration order.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::DeviceEnumerationFailed`] if [`vkEnumeratePhysicalDevices`](https://registry.khronos.org/vulkan/specs/1.3-extensions/man/html/vkEnumeratePhysicalDevices.html) fails.
    pub fn get_physical_devices(self : &Arc<Self>) -> Result<Vec<PhysicalDevice<D>>, ContextError> {
        let physical_devices = self.driver.enumerate_physical_devices(&self.handle)
            .map_err(ContextError::DeviceEnumerationFailed)?;

        Ok(physical_devices.into_iter()
            .map(|physical_device| PhysicalDevice::new(physical_device, self))
            .collect())
    }

    /// Selects the first physical device, in enumeration order, exposing every queue
    /// family capability the bootstrap needs.
    ///
    /// # Errors
    ///
    /// * [`ContextError::DeviceEnumerationFailed`] if enumeration fails.
    /// * [`ContextError::NoSuitableDeviceFound`] if no device qualifies, including when there are none at all.
    pub fn select_physical_device(self : &Arc<Self>) -> Result<(PhysicalDevice<D>, QueueFamilyIndices), ContextError> {
        let devices = self.get_physical_devices()?;
        if devices.is_empty() {
            log::error!("No GPU with Vulkan support found");
        }

        let (device, indices) = select_first_suitable(devices)
            .ok_or(ContextError::NoSuitableDeviceFound)?;
        log::info!("Selected {}", device.name());

        Ok((device, indices))
    }
}

/// Picks the first device whose queue families are complete. Ties go to enumeration order.
pub fn select_first_suitable<D : Driver>(devices : Vec<PhysicalDevice<D>>) -> Option<(PhysicalDevice<D>, QueueFamilyIndices)> {
    devices.into_iter().find_map(|device| {
        let indices = device.queue_family_indices();
        log::debug!("Considering {} (suitable: {})", device.name(), indices.is_complete());

        indices.is_complete().then_some((device, indices))
    })
}
