use std::sync::Arc;

use color_eyre::{Report, eyre::eyre};
#[cfg(target_arch = "wasm32")]
use futures::channel::oneshot;
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{WindowAttributes, WindowId},
};

use crate::{
    common::settings::Settings,
    globe::{animation::AnimationDriver, dots::DotMesh},
    render::render_engine::RenderEngine,
};

fn surface_failure(err: wgpu::SurfaceError) -> Report {
    eyre!("Unrecoverable surface error: {err:?}")
}

pub struct Application {
    settings: Settings,
    mesh: Option<DotMesh>,
    window_attributes: WindowAttributes,
    engine: Option<RenderEngine>,
    driver: AnimationDriver,
    clock: Instant,
    #[cfg(target_arch = "wasm32")]
    receiver: Option<oneshot::Receiver<RenderEngine>>,
    resized: Option<PhysicalSize<u32>>,
    surface_configured: bool,
    error: Option<Report>,
}

impl Application {
    pub fn new(window_attributes: WindowAttributes, settings: Settings, mesh: DotMesh) -> Self {
        let driver = AnimationDriver::new(settings.animation());

        Self {
            settings,
            mesh: Some(mesh),
            window_attributes,
            engine: None,
            driver,
            clock: Instant::now(),
            #[cfg(target_arch = "wasm32")]
            receiver: None,
            resized: None,
            surface_configured: false,
            error: None,
        }
    }

    /// Error that ended the event loop, if any.
    pub fn into_result(self) -> color_eyre::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Report) {
        log::error!("{err:?}");
        self.driver.stop_handle().stop();
        self.error = Some(err);
        event_loop.exit();
    }

    fn engine_ready(&mut self, mut engine: RenderEngine) {
        let size = self.resized.take().unwrap_or_else(|| engine.size());
        self.surface_configured = engine.resize(size);
        self.driver.start(&mut engine.window_handle());
        self.engine = Some(engine);
    }

    #[cfg(target_arch = "wasm32")]
    fn poll_engine(&mut self) {
        let Some(receiver) = self.receiver.as_mut() else {
            return;
        };

        match receiver.try_recv() {
            Ok(Some(engine)) => {
                self.receiver = None;
                self.engine_ready(engine);
            }
            Ok(None) => {
                log::debug!("Render engine not ready yet");
            }
            Err(err) => {
                log::debug!("Canceled engine initialization: {err:?}");
                self.receiver = None;
            }
        }
    }
}

impl ApplicationHandler for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }
        let Some(mesh) = self.mesh.take() else {
            return;
        };

        let window = match event_loop.create_window(self.window_attributes.clone()) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, err.into());
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        match pollster::block_on(RenderEngine::new(window, &self.settings, &mesh)) {
            Ok(engine) => self.engine_ready(engine),
            Err(err) => self.fail(event_loop, err),
        }

        #[cfg(target_arch = "wasm32")]
        {
            let (sender, receiver) = oneshot::channel();
            self.receiver = Some(receiver);

            let settings = self.settings.clone();
            let initialize_engine = async move {
                match RenderEngine::new(Arc::clone(&window), &settings, &mesh).await {
                    Ok(engine) => {
                        if sender.send(engine).is_err() {
                            log::error!("Unable to use render engine: receiver dropped");
                        }
                        // wake the event loop so the engine gets picked up
                        window.request_redraw();
                    }
                    Err(err) => {
                        log::error!("{err:?}");
                    }
                }
            };
            wasm_bindgen_futures::spawn_local(initialize_engine);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        if self.engine.is_none() {
            self.poll_engine();
        }

        let Some(engine) = &mut self.engine else {
            // resizes may arrive before the engine is initialized (e.g. in the browser)
            match event {
                WindowEvent::Resized(physical_size) => {
                    self.resized = Some(physical_size);
                }
                WindowEvent::CloseRequested => {
                    self.driver.stop_handle().stop();
                    event_loop.exit();
                }
                _ => (),
            }
            return;
        };

        match event {
            WindowEvent::Resized(physical_size) => {
                self.surface_configured = engine.resize(physical_size);
                // On macos the window needs to be redrawn manually after resizing
                engine.window().request_redraw();
            }
            WindowEvent::RedrawRequested => {
                if !self.surface_configured {
                    return;
                }

                let timestamp = self.clock.elapsed().as_secs_f64() * 1000.0;
                let mut scheduler = engine.window_handle();
                match self.driver.tick(timestamp, engine, &mut scheduler) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        self.surface_configured = engine.resize(engine.size());
                    }
                    Err(err @ (wgpu::SurfaceError::OutOfMemory | wgpu::SurfaceError::Other)) => {
                        self.fail(event_loop, surface_failure(err));
                    }
                    // This happens when a frame takes too long to present
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Surface timeout")
                    }
                }
            }
            WindowEvent::CloseRequested => {
                self.driver.stop_handle().stop();
                event_loop.exit();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(wgpu::SurfaceError::OutOfMemory, "OutOfMemory")]
    #[case(wgpu::SurfaceError::Other, "Other")]
    fn surface_failures_name_the_variant(#[case] err: wgpu::SurfaceError, #[case] name: &str) {
        let report = surface_failure(err);

        assert!(report.to_string().contains(name));
    }

    #[test]
    fn recorded_error_is_returned_from_the_loop() {
        let mut app = Application::new(
            WindowAttributes::default(),
            Settings::default(),
            DotMesh::default(),
        );
        assert!(app.error.is_none());

        app.error = Some(surface_failure(wgpu::SurfaceError::OutOfMemory));

        let err = app.into_result().unwrap_err();
        assert!(err.to_string().contains("OutOfMemory"));
    }
}
