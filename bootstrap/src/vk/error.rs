use ash::vk;
use thiserror::Error;

/// Failures of the context bootstrap. Every variant aborts the bootstrap.
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Failed to load the Vulkan library: {0}")]
    LoadingFailed(String),
    #[error("Validation layers requested but not available: {0:?}")]
    ValidationLayerUnavailable(Vec<String>),
    #[error("Failed to create instance: {0}")]
    InstanceCreationFailed(vk::Result),
    #[error("Failed to set up debug messenger")]
    DebugMessengerSetupFailed(#[from] MessengerError),
    #[error("Failed to enumerate physical devices: {0}")]
    DeviceEnumerationFailed(vk::Result),
    #[error("Failed to find a suitable GPU")]
    NoSuitableDeviceFound,
    #[error("Failed to create logical device: {0}")]
    LogicalDeviceCreationFailed(vk::Result),
}

/// Why a debug messenger could not be attached to an instance.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessengerError {
    #[error("vkCreateDebugUtilsMessengerEXT is not exposed by the runtime")]
    MissingEntryPoint,
    #[error("vkCreateDebugUtilsMessengerEXT failed: {0}")]
    CreationFailed(vk::Result),
}
