use std::{ffi::{c_void, CStr, CString}, panic::{self, AssertUnwindSafe}, sync::Arc};

use ash::{ext::debug_utils, prelude::VkResult, vk};

use crate::vk::{ContextError, DebugMessage, DebugSink, DeviceInfo, Driver, InstanceInfo, MessageKind, MessengerConfig, MessengerError, Severity};

type SinkBox = Box<Arc<dyn DebugSink>>;

/// Forwards runtime messages to the [`DebugSink`] stored behind `p_user_data`.
///
/// Never unwinds into the runtime and always returns `VK_FALSE` so the triggering call
/// is not aborted.
unsafe extern "system" fn vulkan_debug_utils_callback(
    message_severity : vk::DebugUtilsMessageSeverityFlagsEXT,
    message_types : vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data : *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    p_user_data : *mut c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() || p_user_data.is_null() {
        return vk::FALSE;
    }

    let callback_data = &*p_callback_data;
    let text = if callback_data.p_message.is_null() {
        String::new()
    } else {
        CStr::from_ptr(callback_data.p_message).to_string_lossy().into_owned()
    };

    let message = DebugMessage::new(Severity::from(message_severity), MessageKind::from(message_types), text);
    let sink = &*(p_user_data as *const Arc<dyn DebugSink>);
    _ = panic::catch_unwind(AssertUnwindSafe(|| sink.message(&message)));

    vk::FALSE
}

fn messenger_create_info<'a>(config : &MessengerConfig, sink : &'a SinkBox) -> vk::DebugUtilsMessengerCreateInfoEXT<'a> {
    vk::DebugUtilsMessengerCreateInfoEXT::default()
        .flags(vk::DebugUtilsMessengerCreateFlagsEXT::empty())
        .message_severity(config.severity)
        .message_type(config.kinds)
        .pfn_user_callback(Some(vulkan_debug_utils_callback))
        .user_data(sink.as_ref() as *const Arc<dyn DebugSink> as *mut c_void)
}

fn as_pointers(names : &[CString]) -> Vec<*const std::ffi::c_char> {
    names.iter().map(|name| name.as_ptr()).collect()
}

/// An instance created through the Vulkan loader.
pub struct NativeInstance {
    handle : ash::Instance,
    // Target of the user data pointer of the messenger chained at creation.
    _sink : Option<SinkBox>,
}

impl NativeInstance {
    #[inline] pub fn handle(&self) -> &ash::Instance { &self.handle }
}

pub struct NativeMessenger {
    handle : vk::DebugUtilsMessengerEXT,
    loader : debug_utils::Instance,
    _sink : SinkBox,
}

/// [`Driver`] backed by the system Vulkan loader.
pub struct NativeDriver {
    entry : ash::Entry,
}

impl NativeDriver {
    /// Loads the Vulkan library.
    pub fn load() -> Result<Self, ContextError> {
        let entry = unsafe { ash::Entry::load() }
            .map_err(|err| ContextError::LoadingFailed(err.to_string()))?;

        Ok(Self { entry })
    }

    #[inline] pub fn entry(&self) -> &ash::Entry { &self.entry }
}

impl Driver for NativeDriver {
    type Instance = NativeInstance;
    type Messenger = NativeMessenger;
    type PhysicalDevice = vk::PhysicalDevice;
    type Device = ash::Device;
    type Queue = vk::Queue;

    fn enumerate_instance_extensions(&self) -> VkResult<Vec<CString>> {
        let properties = unsafe { self.entry.enumerate_instance_extension_properties(None)? };

        Ok(properties.iter()
            .filter_map(|property| property.extension_name_as_c_str().ok())
            .map(CStr::to_owned)
            .collect())
    }

    fn enumerate_instance_layers(&self) -> VkResult<Vec<CString>> {
        let properties = unsafe { self.entry.enumerate_instance_layer_properties()? };

        Ok(properties.iter()
            .filter_map(|property| property.layer_name_as_c_str().ok())
            .map(CStr::to_owned)
            .collect())
    }

    fn create_instance(&self, info : &InstanceInfo) -> VkResult<NativeInstance> {
        let app_info = vk::ApplicationInfo::default()
            .application_name(&info.application_name)
            .application_version(info.application_version)
            .engine_name(&info.engine_name)
            .engine_version(info.engine_version)
            .api_version(info.api_version);

        let extension_names = as_pointers(&info.extensions);
        let layer_names = as_pointers(&info.layers);

        let sink = info.messenger.as_ref().map(|config| Box::new(config.sink.clone()));
        let mut debug_utils_messenger_create_info = info.messenger.as_ref()
            .zip(sink.as_ref())
            .map(|(config, sink)| messenger_create_info(config, sink));

        let mut instance_create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&extension_names)
            .enabled_layer_names(&layer_names);
        if let Some(create_info) = debug_utils_messenger_create_info.as_mut() {
            instance_create_info = instance_create_info.push_next(create_info);
        }

        let handle = unsafe { self.entry.create_instance(&instance_create_info, None)? };

        Ok(NativeInstance { handle, _sink : sink })
    }

    fn destroy_instance(&self, instance : &mut NativeInstance) {
        unsafe {
            instance.handle.destroy_instance(None);
        }
    }

    fn create_debug_messenger(&self,
        instance : &NativeInstance,
        config : &MessengerConfig
    ) -> Result<NativeMessenger, MessengerError> {
        // The loader returns null for extension commands that were not enabled.
        let entry_point = unsafe {
            self.entry.get_instance_proc_addr(instance.handle.handle(), c"vkCreateDebugUtilsMessengerEXT".as_ptr())
        };
        if entry_point.is_none() {
            return Err(MessengerError::MissingEntryPoint);
        }

        let loader = debug_utils::Instance::new(&self.entry, &instance.handle);
        let sink : SinkBox = Box::new(config.sink.clone());
        let create_info = messenger_create_info(config, &sink);

        let handle = unsafe {
            loader.create_debug_utils_messenger(&create_info, None)
                .map_err(MessengerError::CreationFailed)?
        };

        Ok(NativeMessenger { handle, loader, _sink : sink })
    }

    fn destroy_debug_messenger(&self, _instance : &NativeInstance, messenger : &mut NativeMessenger) {
        unsafe {
            messenger.loader.destroy_debug_utils_messenger(messenger.handle, None);
        }
    }

    fn enumerate_physical_devices(&self, instance : &NativeInstance) -> VkResult<Vec<vk::PhysicalDevice>> {
        unsafe { instance.handle.enumerate_physical_devices() }
    }

    fn physical_device_name(&self, instance : &NativeInstance, device : vk::PhysicalDevice) -> String {
        let properties = unsafe { instance.handle.get_physical_device_properties(device) };

        properties.device_name_as_c_str()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|_| format!("{:?}", device))
    }

    fn queue_family_properties(&self,
        instance : &NativeInstance,
        device : vk::PhysicalDevice
    ) -> Vec<vk::QueueFamilyProperties> {
        unsafe { instance.handle.get_physical_device_queue_family_properties(device) }
    }

    fn create_device(&self,
        instance : &NativeInstance,
        physical_device : vk::PhysicalDevice,
        info : &DeviceInfo
    ) -> VkResult<ash::Device> {
        let queue_create_infos = [
            vk::DeviceQueueCreateInfo::default()
                .queue_family_index(info.queue_family_index)
                .queue_priorities(info.queue_priorities)
        ];

        let layer_names = as_pointers(info.layers);

        // Device layers are ignored by current loaders; they are still passed for older ones.
        #[allow(deprecated)]
        let device_create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_features(&info.features)
            .enabled_layer_names(&layer_names);

        unsafe { instance.handle.create_device(physical_device, &device_create_info, None) }
    }

    fn get_device_queue(&self, device : &ash::Device, family_index : u32, queue_index : u32) -> vk::Queue {
        unsafe { device.get_device_queue(family_index, queue_index) }
    }

    fn destroy_device(&self, device : &mut ash::Device) {
        unsafe {
            device.destroy_device(None);
        }
    }
}
