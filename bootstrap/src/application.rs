use std::time::Duration;

use anyhow::Result;

use crate::vk::{Context, ContextOptions, NativeDriver};
use crate::window::Window;

pub struct ApplicationOptions {
    pub title : String,
    pub width : u32,
    pub height : u32,
    pub context : ContextOptions,
}

impl Default for ApplicationOptions {
    fn default() -> Self {
        Self {
            title : "Vulkan".to_owned(),
            width : 800,
            height : 600,
            context : ContextOptions::default(),
        }
    }
}

impl ApplicationOptions {
    #[inline] pub fn title(mut self, title : impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[inline] pub fn resolution(mut self, width : u32, height : u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    value_builder! { context, ContextOptions }
}

/// A window with a Vulkan context.
///
/// The context is declared first so that it is released before the window.
pub struct Application {
    pub context : Context<NativeDriver>,
    pub window : Window,
}

impl Application {
    pub fn new(options : ApplicationOptions) -> Result<Self> {
        let window = Window::new(options.width, options.height, options.title.clone())?;
        let extensions = window.required_instance_extensions()?;

        let driver = NativeDriver::load()?;
        let context = Context::new(driver, &options.context, &extensions)?;

        Ok(Self { context, window })
    }

    /// Pumps window events until the window is closed.
    pub fn run(&mut self) {
        while !self.window.should_close() {
            self.window.wait_events(Duration::from_millis(16));
        }

        log::info!("Window closed");
    }
}
