use std::{ffi::CString, sync::Arc};

use ash::vk;

use crate::vk::{
    check_layer_support, resolve_instance_extensions, ContextError, DebugMessenger, DebugSink, Driver, Instance,
    InstanceInfo, LayerPolicy, LogSink, LogicalDevice, MessengerConfig, MessengerPolicy, PhysicalDevice, Queue,
    VALIDATION_LAYER,
};

/// Configuration of the context bootstrap.
#[derive(Clone)]
pub struct ContextOptions {
    pub(in crate) application_name : CString,
    pub(in crate) application_version : u32,
    pub(in crate) engine_name : CString,
    pub(in crate) engine_version : u32,
    pub(in crate) api_version : u32,
    pub(in crate) instance_extensions : Vec<CString>,
    pub(in crate) validation : bool,
    pub(in crate) layers : Vec<CString>,
    pub(in crate) layer_policy : LayerPolicy,
    pub(in crate) messenger_policy : MessengerPolicy,
    pub(in crate) message_severity : vk::DebugUtilsMessageSeverityFlagsEXT,
    pub(in crate) message_kinds : vk::DebugUtilsMessageTypeFlagsEXT,
    pub(in crate) sink : Arc<dyn DebugSink>,
}

impl ContextOptions {
    value_builder! { application_name, CString }
    value_builder! { application_version, u32 }
    value_builder! { engine_name, CString }
    value_builder! { engine_version, u32 }
    value_builder! { api_version, u32 }
    value_builder! { instance_extensions, Vec<CString> }
    value_builder! { validation, bool }
    value_builder! { layers, Vec<CString> }
    value_builder! { layer_policy, LayerPolicy }
    value_builder! { messenger_policy, MessengerPolicy }
    value_builder! { message_severity, vk::DebugUtilsMessageSeverityFlagsEXT }
    value_builder! { message_kinds, vk::DebugUtilsMessageTypeFlagsEXT }
    value_builder! { sink, Arc<dyn DebugSink> }

    fn messenger_config(&self) -> MessengerConfig {
        MessengerConfig {
            severity : self.message_severity,
            kinds : self.message_kinds,
            sink : self.sink.clone(),
        }
    }
}

impl Default for ContextOptions {
    fn default() -> Self {
        let messenger = MessengerConfig::default();

        Self {
            application_name : c"Vulkan Engine".to_owned(),
            application_version : vk::make_api_version(0, 1, 0, 0),
            engine_name : c"No Engine".to_owned(),
            engine_version : vk::make_api_version(0, 1, 0, 0),
            api_version : vk::API_VERSION_1_0,
            instance_extensions : vec![],
            validation : cfg!(debug_assertions),
            layers : vec![VALIDATION_LAYER.to_owned()],
            layer_policy : LayerPolicy::default(),
            messenger_policy : MessengerPolicy::default(),
            message_severity : messenger.severity,
            message_kinds : messenger.kinds,
            sink : Arc::new(LogSink),
        }
    }
}

/// An instance, its optional debug messenger, and a logical device with one graphics queue.
///
/// Fields drop in declaration order, which is the reverse of the order they are
/// acquired in: device, messenger, instance.
pub struct Context<D : Driver> {
    logical_device : LogicalDevice<D>,
    debug_messenger : Option<DebugMessenger<D>>,
    instance : Arc<Instance<D>>,
}

impl<D : Driver> Context<D> {
    #[inline] pub fn instance(&self) -> &Arc<Instance<D>> { &self.instance }
    #[inline] pub fn debug_messenger(&self) -> Option<&DebugMessenger<D>> { self.debug_messenger.as_ref() }
    #[inline] pub fn logical_device(&self) -> &LogicalDevice<D> { &self.logical_device }
    #[inline] pub fn physical_device(&self) -> &PhysicalDevice<D> { &self.logical_device.physical_device }
    #[inline] pub fn graphics_queue(&self) -> &Queue<D> { self.logical_device.graphics_queue() }

    /// Runs the whole bootstrap.
    ///
    /// Stages run in order and each one requires the previous one to succeed. When a stage
    /// fails, everything acquired so far is released in reverse order before the error is
    /// returned.
    ///
    /// # Arguments
    ///
    /// * `driver` - The driver performing native calls.
    /// * `options` - Application metadata and diagnostics configuration.
    /// * `window_extensions` - Instance extensions required by the windowing layer.
    pub fn new(driver : D, options : &ContextOptions, window_extensions : &[CString]) -> Result<Self, ContextError> {
        let extensions = resolve_instance_extensions(window_extensions, &options.instance_extensions, options.validation);

        let layers = if options.validation {
            negotiate_layers(&driver, options)?
        } else {
            vec![]
        };

        let messenger = options.validation.then(|| options.messenger_config());
        let instance = Instance::new(driver, &InstanceInfo {
            application_name : options.application_name.clone(),
            application_version : options.application_version,
            engine_name : options.engine_name.clone(),
            engine_version : options.engine_version,
            api_version : options.api_version,
            extensions,
            layers : layers.clone(),
            messenger : messenger.clone(),
        })?;

        let debug_messenger = match messenger {
            Some(config) => match DebugMessenger::new(&instance, &config) {
                Ok(debug_messenger) => Some(debug_messenger),
                Err(err) if options.messenger_policy == MessengerPolicy::Optional => {
                    log::warn!("Continuing without a debug messenger: {err}");
                    None
                },
                Err(err) => return Err(err.into()),
            },
            None => None,
        };

        let (physical_device, indices) = instance.select_physical_device()?;
        let logical_device = physical_device.create_logical_device(&instance, &indices, &layers)?;
        log::info!("Created logical device on {}", physical_device.name());

        Ok(Self {
            logical_device,
            debug_messenger,
            instance,
        })
    }
}

/// Returns the layers to create the instance with, or fails under [`LayerPolicy::Strict`]
/// if any of them is missing.
fn negotiate_layers<D : Driver>(driver : &D, options : &ContextOptions) -> Result<Vec<CString>, ContextError> {
    let available = driver.enumerate_instance_layers()
        .map_err(ContextError::InstanceCreationFailed)?;

    let report = check_layer_support(&options.layers, &available);
    if !report.is_satisfied() {
        match options.layer_policy {
            LayerPolicy::Strict => return Err(ContextError::ValidationLayerUnavailable(report.missing_names())),
            LayerPolicy::BestEffort => log::warn!("Validation layer requested but not supported"),
        }
    }

    Ok(options.layers.clone())
}
