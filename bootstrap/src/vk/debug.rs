use std::sync::Arc;

use ash::vk;
use derive_getters::Getters;

use crate::traits::BorrowHandle;
use crate::vk::{Driver, Instance, MessengerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Verbose,
    Info,
    Warning,
    Error,
}

impl From<vk::DebugUtilsMessageSeverityFlagsEXT> for Severity {
    fn from(flags : vk::DebugUtilsMessageSeverityFlagsEXT) -> Self {
        if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
            Severity::Error
        } else if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
            Severity::Warning
        } else if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
            Severity::Info
        } else {
            Severity::Verbose
        }
    }
}

impl From<Severity> for log::Level {
    fn from(severity : Severity) -> Self {
        match severity {
            Severity::Verbose => log::Level::Trace,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    General,
    Validation,
    Performance,
    DeviceAddressBinding,
}

impl From<vk::DebugUtilsMessageTypeFlagsEXT> for MessageKind {
    fn from(flags : vk::DebugUtilsMessageTypeFlagsEXT) -> Self {
        if flags.contains(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION) {
            MessageKind::Validation
        } else if flags.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
            MessageKind::Performance
        } else if flags.contains(vk::DebugUtilsMessageTypeFlagsEXT::DEVICE_ADDRESS_BINDING) {
            MessageKind::DeviceAddressBinding
        } else {
            MessageKind::General
        }
    }
}

/// A message emitted by the Vulkan runtime or one of its layers.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct DebugMessage {
    severity : Severity,
    kind : MessageKind,
    text : String,
}

impl DebugMessage {
    pub fn new(severity : Severity, kind : MessageKind, text : impl Into<String>) -> Self {
        Self { severity, kind, text : text.into() }
    }
}

/// Receives runtime messages.
///
/// Called synchronously, possibly re-entrantly, from inside any Vulkan call made after
/// the messenger is attached. Implementations must only record or log.
pub trait DebugSink : Send + Sync {
    fn message(&self, message : &DebugMessage);
}

/// Writes every message to the `log` facade at the level matching its severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn message(&self, message : &DebugMessage) {
        log::log!(target: "validation", log::Level::from(message.severity), "validation layer: {}", message.text);
    }
}

/// Which messages a messenger subscribes to, and where they go.
#[derive(Clone)]
pub struct MessengerConfig {
    pub severity : vk::DebugUtilsMessageSeverityFlagsEXT,
    pub kinds : vk::DebugUtilsMessageTypeFlagsEXT,
    pub sink : Arc<dyn DebugSink>,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            severity : vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            kinds : vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            sink : Arc::new(LogSink),
        }
    }
}

/// Whether failing to attach the debug messenger aborts the bootstrap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MessengerPolicy {
    #[default]
    Required,
    /// Log the failure and carry on without a messenger.
    Optional,
}

/// A debug messenger attached to an [`Instance`].
pub struct DebugMessenger<D : Driver> {
    handle : D::Messenger,
    instance : Arc<Instance<D>>,
}

impl<D : Driver> BorrowHandle for DebugMessenger<D> {
    type Target = D::Messenger;

    fn handle(&self) -> &D::Messenger { &self.handle }
}

impl<D : Driver> Drop for DebugMessenger<D> {
    fn drop(&mut self) {
        log::debug!("Destroying debug messenger");
        self.instance.driver().destroy_debug_messenger(self.instance.handle(), &mut self.handle);
    }
}

impl<D : Driver> DebugMessenger<D> {
    #[inline] pub fn instance(&self) -> &Arc<Instance<D>> { &self.instance }

    /// Attaches a new messenger to the given instance.
    ///
    /// # Arguments
    ///
    /// * `instance` - The instance the messenger reports for. It is kept alive until the messenger is dropped.
    /// * `config` - The severities and kinds to subscribe to, and the sink receiving them.
    ///
    /// # Errors
    ///
    /// * [`MessengerError::MissingEntryPoint`] if `vkCreateDebugUtilsMessengerEXT` cannot be resolved.
    /// * [`MessengerError::CreationFailed`] if the creation call fails.
    pub fn new(instance : &Arc<Instance<D>>, config : &MessengerConfig) -> Result<Self, MessengerError> {
        let handle = instance.driver().create_debug_messenger(instance.handle(), config)?;
        log::debug!("Debug messenger attached");

        Ok(Self {
            handle,
            instance : instance.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vk::fake::{FakeDriver, Lifecycle};

    fn instance(driver : FakeDriver) -> Arc<Instance<FakeDriver>> {
        match Instance::new(driver, &FakeDriver::instance_info()) {
            Ok(instance) => instance,
            Err(err) => panic!("{err}"),
        }
    }

    #[test]
    pub fn severity_picks_the_highest_bit() {
        assert_eq!(Severity::from(vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE), Severity::Verbose);
        assert_eq!(Severity::from(vk::DebugUtilsMessageSeverityFlagsEXT::INFO), Severity::Info);
        assert_eq!(Severity::from(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING), Severity::Warning);
        assert_eq!(
            Severity::from(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR),
            Severity::Error
        );
        assert_eq!(Severity::from(vk::DebugUtilsMessageSeverityFlagsEXT::empty()), Severity::Verbose);
    }

    #[test]
    pub fn kind_from_flags() {
        assert_eq!(MessageKind::from(vk::DebugUtilsMessageTypeFlagsEXT::GENERAL), MessageKind::General);
        assert_eq!(MessageKind::from(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION), MessageKind::Validation);
        assert_eq!(MessageKind::from(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE), MessageKind::Performance);
    }

    #[test]
    pub fn messenger_is_destroyed_before_instance() {
        let driver = FakeDriver::default();
        let log = driver.log.clone();

        let instance = instance(driver);
        let messenger = DebugMessenger::new(&instance, &MessengerConfig::default());
        assert!(messenger.is_ok());

        drop(instance);
        assert_eq!(log.lifecycle(), vec![Lifecycle::CreateInstance, Lifecycle::CreateMessenger]);

        drop(messenger);
        assert_eq!(log.lifecycle(), vec![
            Lifecycle::CreateInstance,
            Lifecycle::CreateMessenger,
            Lifecycle::DestroyMessenger,
            Lifecycle::DestroyInstance,
        ]);
    }

    #[test]
    pub fn missing_entry_point_is_reported() {
        let driver = FakeDriver::default().messenger_error(MessengerError::MissingEntryPoint);
        let log = driver.log.clone();

        let instance = instance(driver);
        match DebugMessenger::new(&instance, &MessengerConfig::default()) {
            Err(err) => assert_eq!(err, MessengerError::MissingEntryPoint),
            Ok(_) => panic!("Messenger should not have been created"),
        }

        drop(instance);
        assert_eq!(log.lifecycle(), vec![Lifecycle::CreateInstance, Lifecycle::DestroyInstance]);
    }
}
