use std::ffi::CString;

use ash::{prelude::VkResult, vk};

use crate::vk::{MessengerConfig, MessengerError};

/// Parameters of `vkCreateInstance`.
pub struct InstanceInfo {
    pub application_name : CString,
    pub application_version : u32,
    pub engine_name : CString,
    pub engine_version : u32,
    pub api_version : u32,
    pub extensions : Vec<CString>,
    pub layers : Vec<CString>,
    /// When set, the messenger is chained into instance creation so that creation and
    /// destruction of the instance itself are reported.
    pub messenger : Option<MessengerConfig>,
}

/// Parameters of `vkCreateDevice`. Exactly one queue family is requested.
pub struct DeviceInfo<'a> {
    pub queue_family_index : u32,
    pub queue_priorities : &'a [f32],
    pub features : vk::PhysicalDeviceFeatures,
    pub layers : &'a [CString],
}

/// Every native call the bootstrap performs.
///
/// Handles produced by a driver are only ever passed back to that same driver. The
/// wrappers in this module guarantee that children are destroyed before their parents,
/// so implementations do not need to track lifetimes themselves.
pub trait Driver {
    type Instance;
    type Messenger;
    type PhysicalDevice : Copy;
    type Device;
    type Queue : Copy;

    /// Instance extensions supported by the host runtime.
    fn enumerate_instance_extensions(&self) -> VkResult<Vec<CString>>;

    /// Instance layers installed on the host.
    fn enumerate_instance_layers(&self) -> VkResult<Vec<CString>>;

    fn create_instance(&self, info : &InstanceInfo) -> VkResult<Self::Instance>;
    fn destroy_instance(&self, instance : &mut Self::Instance);

    fn create_debug_messenger(&self,
        instance : &Self::Instance,
        config : &MessengerConfig
    ) -> Result<Self::Messenger, MessengerError>;
    fn destroy_debug_messenger(&self, instance : &Self::Instance, messenger : &mut Self::Messenger);

    fn enumerate_physical_devices(&self, instance : &Self::Instance) -> VkResult<Vec<Self::PhysicalDevice>>;
    fn physical_device_name(&self, instance : &Self::Instance, device : Self::PhysicalDevice) -> String;
    fn queue_family_properties(&self,
        instance : &Self::Instance,
        device : Self::PhysicalDevice
    ) -> Vec<vk::QueueFamilyProperties>;

    fn create_device(&self,
        instance : &Self::Instance,
        physical_device : Self::PhysicalDevice,
        info : &DeviceInfo
    ) -> VkResult<Self::Device>;
    fn get_device_queue(&self, device : &Self::Device, family_index : u32, queue_index : u32) -> Self::Queue;
    fn destroy_device(&self, device : &mut Self::Device);
}
