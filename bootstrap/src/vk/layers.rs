use std::ffi::{CStr, CString};

/// The Khronos validation layer.
pub const VALIDATION_LAYER : &CStr = c"VK_LAYER_KHRONOS_validation";

/// What to do when a requested validation layer is not installed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LayerPolicy {
    /// Warn and create the instance with the requested layers anyway.
    #[default]
    BestEffort,
    /// Refuse to create the instance.
    Strict,
}

/// Outcome of [`check_layer_support`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LayerReport {
    missing : Vec<CString>,
}

impl LayerReport {
    /// Returns true if every requested layer is available.
    #[inline] pub fn is_satisfied(&self) -> bool { self.missing.is_empty() }

    /// Requested layers that are not available, in request order.
    #[inline] pub fn missing(&self) -> &[CString] { &self.missing }

    pub fn missing_names(&self) -> Vec<String> {
        self.missing.iter().map(|layer| layer.to_string_lossy().into_owned()).collect()
    }
}

/// Checks the requested layers against the layers installed on the host.
///
/// Names are compared exactly. One warning is logged for every missing layer.
///
/// # Arguments
///
/// * `requested` - The layers the instance will be created with.
/// * `available` - The layers reported by `vkEnumerateInstanceLayerProperties`.
pub fn check_layer_support(requested : &[CString], available : &[CString]) -> LayerReport {
    let missing = requested.iter()
        .filter(|layer| !available.contains(layer))
        .cloned()
        .collect::<Vec<_>>();

    for layer in &missing {
        log::warn!("Layer not supported: {}", layer.to_string_lossy());
    }

    LayerReport { missing }
}
