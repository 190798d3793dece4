pub mod app;
pub mod common;
pub mod globe;
pub mod render;

use app::Application;
use common::settings::Settings;
use globe::{build_dot_mesh, land_mask::LandMask};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
use winit::{event_loop::EventLoop, window::Window};

#[cfg(not(target_arch = "wasm32"))]
fn window_attributes() -> color_eyre::Result<winit::window::WindowAttributes> {
    use winit::dpi::LogicalSize;

    let (width, height) = (800, 600);
    Ok(Window::default_attributes()
        .with_title("dot-globe")
        .with_min_inner_size(LogicalSize::new(width as f64 / 2.0, height as f64 / 2.0))
        .with_inner_size(LogicalSize::new(width as f64, height as f64)))
}

#[cfg(target_arch = "wasm32")]
fn window_attributes() -> color_eyre::Result<winit::window::WindowAttributes> {
    use color_eyre::eyre::{OptionExt, eyre};
    use wasm_bindgen::JsCast;
    use winit::platform::web::WindowAttributesExtWebSys;

    let canvas = wgpu::web_sys::window()
        .ok_or_eyre("Unable to get window")?
        .document()
        .ok_or_eyre("Unable to get document")?
        .get_element_by_id("canvas")
        .ok_or_eyre("Unable to get canvas by id \"canvas\"")?
        .dyn_into::<wgpu::web_sys::HtmlCanvasElement>()
        .map_err(|_| eyre!("Unable to convert canvas to HtmlCanvasElement"))?;

    Ok(Window::default_attributes().with_canvas(Some(canvas)))
}

/// Builds the dot mesh and runs the globe until its window is closed.
///
/// The mesh is complete before the event loop starts, so the first frame already shows
/// every dot.
pub fn run(settings: Settings, mask: LandMask) -> color_eyre::Result<()> {
    let mesh = build_dot_mesh(&settings, &mask)?;
    drop(mask);

    let event_loop = EventLoop::new()?;
    #[allow(unused_mut)]
    let mut app = Application::new(window_attributes()?, settings, mesh);

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;

        event_loop.spawn_app(app);
        return Ok(());
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        event_loop.run_app(&mut app)?;
        app.into_result()
    }
}

/// Browser entry point. `pixels` is the decoded RGBA8 land mask, `settings` an optional
/// TOML document overriding the defaults.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_globe(
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    settings: Option<String>,
) -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    // fails only when a logger is already installed by an earlier call
    console_log::init_with_level(log::Level::Info).ok();

    let result = (|| -> color_eyre::Result<()> {
        let settings = match settings {
            Some(toml) => Settings::from_toml(&toml)?,
            None => Settings::default(),
        };
        let mask = LandMask::new(width, height, pixels)?;
        run(settings, mask)
    })();

    result.map_err(|err| {
        log::error!("{err:?}");
        JsValue::from_str(&err.to_string())
    })
}
