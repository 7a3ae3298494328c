use std::ffi::CString;

use ash::ext::debug_utils;

/// Computes the instance extensions to request.
///
/// The windowing extensions come first, verbatim and in order, followed by `extra`.
/// Duplicates are dropped, keeping the first occurrence. `VK_EXT_debug_utils` is appended
/// when `diagnostics` is set and nobody asked for it already.
pub fn resolve_instance_extensions(required : &[CString], extra : &[CString], diagnostics : bool) -> Vec<CString> {
    let mut extensions = Vec::<CString>::with_capacity(required.len() + extra.len() + 1);

    let debug_extension = diagnostics.then(|| debug_utils::NAME.to_owned());
    for extension in required.iter().chain(extra).chain(debug_extension.as_ref()) {
        if !extensions.contains(extension) {
            extensions.push(extension.clone());
        }
    }

    extensions
}
