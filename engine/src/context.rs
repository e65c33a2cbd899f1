use std::{ffi::CStr, num::NonZeroU32};

use anyhow::{Context as _, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{Display, DisplayApiPreference},
    prelude::*,
    surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::window::Window;

/// A window surface with a current OpenGL 3.3 core context.
pub struct GlContext {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
}

impl GlContext {
    pub fn create(window: &Window, vsync: bool) -> Result<(Self, glow::Context)> {
        firestorm::profile_method!(create);

        let display_handle = window.display_handle()?.as_raw();
        let window_handle = window.window_handle()?.as_raw();

        #[cfg(target_os = "windows")]
        let preference = DisplayApiPreference::Wgl(Some(window_handle));
        #[cfg(target_os = "macos")]
        let preference = DisplayApiPreference::Cgl;
        #[cfg(all(unix, not(target_os = "macos")))]
        let preference = DisplayApiPreference::Egl;

        let display = unsafe { Display::new(display_handle, preference)? };

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(0)
            .with_depth_size(24)
            .with_transparency(false)
            .build();
        let config = unsafe { display.find_configs(template)? }
            .next()
            .context("No suitable GL config found")?;

        let (width, height): (u32, u32) = window.inner_size().into();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window_handle,
            non_zero(width),
            non_zero(height),
        );
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes)? };

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(window_handle));
        let context = unsafe { display.create_context(&config, &context_attributes)? }
            .make_current(&surface)?;

        let interval = if vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            log::warn!("Failed to set swap interval (vsync {vsync}): {err}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s: &CStr| display.get_proc_address(s))
        };
        log::debug!("Created GL context with {width}x{height} surface");

        Ok((Self { surface, context }, gl))
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.surface
            .resize(&self.context, non_zero(width), non_zero(height));
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("Failed to swap buffers")
    }
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}
