//! Native OpenGL demo for bindery-core.
//!
//! Opens a window through glutin + winit and draws a spinning textured quad. Every buffer,
//! texture, vertex array and program is created, bound and deleted through a [`Bindery`], so
//! redundant binds never reach the driver.
//!
//! Run with:
//! ```sh
//! cargo run -p native-quad -- --gl-version 4.6 --debug-output
//! ```

mod cli;
mod logging;
mod scene;
mod window;

use bindery_core::{
    Bindery, BinderyConfig, GlVersion,
    gl::debug::{DebugFilter, apply_debug_filter, enable_debug_output},
};
use clap::Parser;
use color_eyre::{
    Report,
    eyre::{Context, Result, bail},
};
use glow::HasContext;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::WindowId,
};

use crate::{
    cli::Cli,
    logging::{LoggingConfig, init_logging},
    scene::Scene,
    window::GlWindow,
};

fn main() -> Result<()> {
    // panic hook
    color_eyre::install()?;

    init_logging(&LoggingConfig::from_env()).wrap_err("Failed to initialize logging")?;

    let cli = Cli::parse();
    let config = cli.apply(BinderyConfig::from_env()?);
    if config.version < GlVersion::V3_3 {
        bail!("the demo shaders need OpenGL 3.3 or newer, got {}", config.version);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        gl_version = %config.version,
        profile = %config.profile,
        "native-quad starting up"
    );

    let event_loop = EventLoop::new()?;
    let mut app = App {
        config,
        size: (cli.width, cli.height),
        state: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    app.error.map_or(Ok(()), Err)
}

struct App {
    config: BinderyConfig,
    size: (u32, u32),
    state: Option<AppState>,
    error: Option<Report>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Report) {
        tracing::error!(error = %error, "shutting down");
        self.shutdown();
        self.error = Some(error);
        event_loop.exit();
    }

    fn shutdown(&mut self) {
        if let Some(mut state) = self.state.take() {
            state.bindery.terminate(&state.win.gl);
        }
    }
}

struct AppState {
    win: GlWindow,
    bindery: Bindery,
    scene: Scene,
}

impl AppState {
    fn new(event_loop: &ActiveEventLoop, config: &BinderyConfig, size: (u32, u32)) -> Result<Self> {
        let mut win = GlWindow::new(event_loop, "bindery - native quad", size, config)?;

        if config.debug_output {
            enable_debug_output(&mut win.gl, config.version)?;
            apply_debug_filter(
                &win.gl,
                &DebugFilter::mute_severity(glow::DEBUG_SEVERITY_NOTIFICATION),
            );
        }

        let mut bindery = Bindery::new(*config);
        let scene = match Scene::new(&mut bindery, &win.gl) {
            Ok(scene) => scene,
            Err(e) => {
                bindery.terminate(&win.gl);
                return Err(e.wrap_err("failed to set up scene"));
            },
        };

        let mut state = Self { win, bindery, scene };
        if let Err(e) = state.resize() {
            state.bindery.terminate(&state.win.gl);
            return Err(e);
        }
        Ok(state)
    }

    fn resize(&mut self) -> Result<()> {
        let (width, height) = self.win.physical_size();
        unsafe { self.win.gl.viewport(0, 0, width, height) };
        self.scene
            .fit_aspect(&mut self.bindery, &self.win.gl, (width, height))
    }

    fn redraw(&mut self) -> Result<()> {
        self.scene.draw(&mut self.bindery, &self.win.gl)?;
        self.win.swap_buffers()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match AppState::new(event_loop, &self.config, self.size) {
            Ok(state) => self.state = Some(state),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.shutdown();
            event_loop.exit();
            return;
        }

        let Some(state) = self.state.as_mut() else {
            return;
        };

        let result = match event {
            WindowEvent::Resized(new_size) if new_size.width > 0 && new_size.height > 0 => {
                state.win.resize_surface(new_size);
                state.win.window.request_redraw();
                state.resize()
            },
            WindowEvent::RedrawRequested => state.redraw(),
            _ => Ok(()),
        };

        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_ref() {
            state.win.window.request_redraw();
        }
    }
}
