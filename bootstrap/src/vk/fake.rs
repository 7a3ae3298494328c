//! An in-memory [`Driver`] recording every call it receives.

use std::{cell::RefCell, ffi::{CStr, CString}, sync::{Arc, Mutex, Once}};

use ash::{prelude::VkResult, vk};

use crate::vk::{DebugMessage, DebugSink, DeviceInfo, Driver, InstanceInfo, MessageKind, MessengerConfig, MessengerError, Severity};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    EnumerateExtensions,
    EnumerateLayers,
    CreateInstance {
        extensions : Vec<CString>,
        layers : Vec<CString>,
        chained_messenger : bool,
    },
    DestroyInstance,
    CreateMessenger,
    DestroyMessenger,
    EnumeratePhysicalDevices,
    CreateDevice {
        physical_device : usize,
        queue_family : u32,
        queue_priorities : Vec<f32>,
        layers : Vec<CString>,
    },
    GetDeviceQueue { family : u32, index : u32 },
    DestroyDevice,
}

/// Creation and destruction of owned handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    CreateInstance,
    DestroyInstance,
    CreateMessenger,
    DestroyMessenger,
    CreateDevice,
    DestroyDevice,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call : Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Only the calls that create or destroy a handle, in the order they happened.
    pub fn lifecycle(&self) -> Vec<Lifecycle> {
        self.calls().iter().filter_map(|call| match call {
            Call::CreateInstance { .. } => Some(Lifecycle::CreateInstance),
            Call::DestroyInstance => Some(Lifecycle::DestroyInstance),
            Call::CreateMessenger => Some(Lifecycle::CreateMessenger),
            Call::DestroyMessenger => Some(Lifecycle::DestroyMessenger),
            Call::CreateDevice { .. } => Some(Lifecycle::CreateDevice),
            Call::DestroyDevice => Some(Lifecycle::DestroyDevice),
            _ => None,
        }).collect()
    }
}

/// Keeps every message it receives.
#[derive(Default)]
pub struct RecordingSink(Mutex<Vec<DebugMessage>>);

impl RecordingSink {
    pub fn messages(&self) -> Vec<DebugMessage> {
        self.0.lock().unwrap().clone()
    }
}

impl DebugSink for RecordingSink {
    fn message(&self, message : &DebugMessage) {
        self.0.lock().unwrap().push(message.clone());
    }
}

pub struct FakeGpu {
    name : String,
    families : Vec<vk::QueueFlags>,
}

impl FakeGpu {
    pub fn new(name : &str, families : &[vk::QueueFlags]) -> Self {
        Self { name : name.to_owned(), families : families.to_vec() }
    }
}

pub struct FakeInstance {
    sink : Option<Arc<dyn DebugSink>>,
}

impl FakeInstance {
    fn report(&self, text : &str) {
        if let Some(sink) = &self.sink {
            sink.message(&DebugMessage::new(Severity::Verbose, MessageKind::General, text));
        }
    }
}

#[derive(Default)]
pub struct FakeDriver {
    extensions : Vec<CString>,
    layers : Vec<CString>,
    gpus : Vec<FakeGpu>,
    instance_error : Option<vk::Result>,
    messenger_error : Option<MessengerError>,
    enumeration_error : Option<vk::Result>,
    device_error : Option<vk::Result>,
    pub log : CallLog,
}

impl FakeDriver {
    pub fn extension(mut self, name : &CStr) -> Self {
        self.extensions.push(name.to_owned());
        self
    }

    pub fn layer(mut self, name : &CStr) -> Self {
        self.layers.push(name.to_owned());
        self
    }

    pub fn gpu(mut self, gpu : FakeGpu) -> Self {
        self.gpus.push(gpu);
        self
    }

    pub fn instance_error(mut self, error : vk::Result) -> Self {
        self.instance_error = Some(error);
        self
    }

    pub fn messenger_error(mut self, error : MessengerError) -> Self {
        self.messenger_error = Some(error);
        self
    }

    pub fn enumeration_error(mut self, error : vk::Result) -> Self {
        self.enumeration_error = Some(error);
        self
    }

    pub fn device_error(mut self, error : vk::Result) -> Self {
        self.device_error = Some(error);
        self
    }

    /// Minimal instance parameters without diagnostics.
    pub fn instance_info() -> InstanceInfo {
        InstanceInfo {
            application_name : c"test".to_owned(),
            application_version : 0,
            engine_name : c"test".to_owned(),
            engine_version : 0,
            api_version : vk::API_VERSION_1_0,
            extensions : vec![],
            layers : vec![],
            messenger : None,
        }
    }
}

impl Driver for FakeDriver {
    type Instance = FakeInstance;
    type Messenger = ();
    type PhysicalDevice = usize;
    type Device = ();
    type Queue = (u32, u32);

    fn enumerate_instance_extensions(&self) -> VkResult<Vec<CString>> {
        self.log.push(Call::EnumerateExtensions);
        Ok(self.extensions.clone())
    }

    fn enumerate_instance_layers(&self) -> VkResult<Vec<CString>> {
        self.log.push(Call::EnumerateLayers);
        Ok(self.layers.clone())
    }

    fn create_instance(&self, info : &InstanceInfo) -> VkResult<FakeInstance> {
        if let Some(error) = self.instance_error {
            return Err(error);
        }

        self.log.push(Call::CreateInstance {
            extensions : info.extensions.clone(),
            layers : info.layers.clone(),
            chained_messenger : info.messenger.is_some(),
        });

        let instance = FakeInstance {
            sink : info.messenger.as_ref().map(|config| config.sink.clone()),
        };
        instance.report("Instance created");

        Ok(instance)
    }

    fn destroy_instance(&self, instance : &mut FakeInstance) {
        instance.report("Instance destroyed");
        self.log.push(Call::DestroyInstance);
    }

    fn create_debug_messenger(&self, _instance : &FakeInstance, _config : &MessengerConfig) -> Result<(), MessengerError> {
        if let Some(error) = self.messenger_error {
            return Err(error);
        }

        self.log.push(Call::CreateMessenger);
        Ok(())
    }

    fn destroy_debug_messenger(&self, _instance : &FakeInstance, _messenger : &mut ()) {
        self.log.push(Call::DestroyMessenger);
    }

    fn enumerate_physical_devices(&self, _instance : &FakeInstance) -> VkResult<Vec<usize>> {
        self.log.push(Call::EnumeratePhysicalDevices);
        match self.enumeration_error {
            Some(error) => Err(error),
            None => Ok((0..self.gpus.len()).collect()),
        }
    }

    fn physical_device_name(&self, _instance : &FakeInstance, device : usize) -> String {
        self.gpus[device].name.clone()
    }

    fn queue_family_properties(&self, _instance : &FakeInstance, device : usize) -> Vec<vk::QueueFamilyProperties> {
        self.gpus[device].families.iter().map(|&queue_flags| vk::QueueFamilyProperties {
            queue_flags,
            queue_count : 1,
            ..Default::default()
        }).collect()
    }

    fn create_device(&self, instance : &FakeInstance, physical_device : usize, info : &DeviceInfo) -> VkResult<()> {
        if let Some(error) = self.device_error {
            return Err(error);
        }

        self.log.push(Call::CreateDevice {
            physical_device,
            queue_family : info.queue_family_index,
            queue_priorities : info.queue_priorities.to_vec(),
            layers : info.layers.to_vec(),
        });
        instance.report("Device created");

        Ok(())
    }

    fn get_device_queue(&self, _device : &(), family_index : u32, queue_index : u32) -> (u32, u32) {
        self.log.push(Call::GetDeviceQueue { family : family_index, index : queue_index });
        (family_index, queue_index)
    }

    fn destroy_device(&self, _device : &mut ()) {
        self.log.push(Call::DestroyDevice);
    }
}

thread_local! {
    static RECORDS : RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Global logger keeping records per thread, so that concurrently running tests only
/// observe their own output.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata : &log::Metadata) -> bool { true }

    fn log(&self, record : &log::Record) {
        RECORDS.with(|records| records.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) { }
}

static LOGGER : CaptureLogger = CaptureLogger;
static INSTALL_LOGGER : Once = Once::new();

/// Records emitted on the current thread since [`capture_logs`] was called.
pub struct CapturedLogs;

/// Starts capturing log records on the current thread.
///
/// # Panics
///
/// If another logger was installed in the test binary.
pub fn capture_logs() -> CapturedLogs {
    INSTALL_LOGGER.call_once(|| {
        log::set_logger(&LOGGER).expect("Another logger is already installed");
        log::set_max_level(log::LevelFilter::Trace);
    });

    RECORDS.with(|records| records.borrow_mut().clear());
    CapturedLogs
}

impl CapturedLogs {
    /// Messages logged at [`log::Level::Warn`].
    pub fn warnings(&self) -> Vec<String> {
        RECORDS.with(|records| records.borrow().iter()
            .filter(|(level, _)| *level == log::Level::Warn)
            .map(|(_, text)| text.clone())
            .collect())
    }
}
