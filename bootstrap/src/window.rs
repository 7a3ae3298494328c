use std::{ffi::{CStr, CString}, time::Duration};

use ash::vk;
use raw_window_handle::HasDisplayHandle;
use thiserror::Error;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::WindowBuilder,
};

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("Failed to create the event loop")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create the window")]
    Os(#[from] winit::error::OsError),
    #[error("Failed to get the display handle")]
    DisplayHandle(#[from] raw_window_handle::HandleError),
    #[error("Failed to query the instance extensions needed by the window: {0}")]
    Extensions(vk::Result),
}

/// A fixed-size window and the event loop driving it.
///
/// The window is destroyed before the event loop, which shuts the windowing system down.
pub struct Window {
    handle : winit::window::Window,
    event_loop : EventLoop<()>,
    close_requested : bool,
}

impl Window {
    pub fn new<Source : Into<String>>(
        width : u32,
        height : u32,
        title : Source,
    ) -> Result<Self, WindowError> {
        let event_loop = EventLoop::new()?;
        let handle = WindowBuilder::default()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width, height))
            .with_resizable(false)
            .build(&event_loop)?;

        Ok(Self {
            handle,
            event_loop,
            close_requested : false,
        })
    }

    #[inline] pub fn handle(&self) -> &winit::window::Window { &self.handle }

    /// Returns the instance extensions a Vulkan surface for this window would need.
    pub fn required_instance_extensions(&self) -> Result<Vec<CString>, WindowError> {
        let display_handle = self.handle.display_handle()?;
        let extensions = ash_window::enumerate_required_extensions(display_handle.as_raw())
            .map_err(WindowError::Extensions)?;

        // ash-window hands out pointers to static, null-terminated names.
        Ok(extensions.iter()
            .map(|&extension| unsafe { CStr::from_ptr(extension) }.to_owned())
            .collect())
    }

    /// Processes pending events without blocking.
    pub fn poll_events(&mut self) {
        self.pump(Some(Duration::ZERO));
    }

    /// Processes events, waiting at most `timeout` for one to arrive.
    pub fn wait_events(&mut self, timeout : Duration) {
        self.pump(Some(timeout));
    }

    #[inline] pub fn should_close(&self) -> bool { self.close_requested }

    fn pump(&mut self, timeout : Option<Duration>) {
        let window_id = self.handle.id();
        let mut close_requested = false;

        let status = self.event_loop.pump_events(timeout, |event, target| {
            if let Event::WindowEvent { event : WindowEvent::CloseRequested, window_id : id } = event {
                if id == window_id {
                    close_requested = true;
                    target.exit();
                }
            }
        });

        if close_requested || matches!(status, PumpStatus::Exit(_)) {
            self.close_requested = true;
        }
    }
}
