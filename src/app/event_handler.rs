//! Event handler module for Escalera.
//!
//! Contains the App struct and its event handling logic.

use crate::app::app_state::AppState;
use crate::config::Config;
use crate::game::{
    CurrentScreen, MoveStep,
    keys::{GameKey, winit_key_to_game_key},
};
use std::{sync::Arc, time::Instant};
use tracing::info;
use wgpu;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

/// Custom events injected into the winit loop from outside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Ctrl-C arrived; persist the path log and exit.
    Interrupted,
}

/// Main application struct that manages the session lifecycle and event
/// handling.
///
/// This struct implements the [`ApplicationHandler`] trait to handle all
/// window events. It manages the WGPU instance, application state, and window
/// lifecycle.
///
/// # Lifecycle
/// 1. Created with `App::new()` from the parsed configuration
/// 2. Window is set via `set_window()` when the loop resumes
/// 3. Events are handled via [`ApplicationHandler`] trait methods
/// 4. Runs until quit, window close, or interrupt
pub struct App {
    /// The WGPU instance for graphics operations.
    pub instance: wgpu::Instance,
    /// The current application state, None until initialized.
    pub state: Option<AppState>,
    /// The application window, None until set.
    pub window: Option<Arc<Window>>,
    /// Configuration held until the window exists and state can be built.
    pub config: Config,
}

impl App {
    /// Creates a new [`App`] from the parsed configuration.
    pub fn new(config: Config) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self {
            instance,
            state: None,
            window: None,
            config,
        }
    }

    /// Asynchronously sets up the application window and initializes state.
    ///
    /// Creates the WGPU surface for the window and builds [`AppState`],
    /// which generates the first level.
    ///
    /// # Panics
    /// - If surface creation fails
    /// - If [`AppState`] initialization fails
    pub async fn set_window(&mut self, window: Window) {
        let window = Arc::new(window);
        let initial_width = 1360;
        let initial_height = 768;

        let _ = window.request_inner_size(PhysicalSize::new(initial_width, initial_height));

        let surface = self
            .instance
            .create_surface(window.clone())
            .expect("Failed to create surface!");

        let state = AppState::new(
            &self.instance,
            surface,
            &window,
            initial_width,
            initial_height,
            self.config.clone(),
        )
        .await;

        self.window.get_or_insert(window);
        self.state.get_or_insert(state);
    }

    /// Handles window resize events and updates all rendering systems.
    ///
    /// Only processes the resize if both dimensions are greater than 0, so a
    /// minimize never configures a zero-sized surface.
    pub fn handle_resized(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            let state = match &mut self.state {
                Some(state) => state,
                None => {
                    tracing::error!("cannot resize surface without state initialized");
                    return;
                }
            };
            state.resize_surface(width, height);
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    /// Handles application resume events by creating the window.
    ///
    /// # Panics
    /// - If window creation fails
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window =
            match event_loop.create_window(Window::default_attributes().with_title("Escalera")) {
                Ok(window) => window,
                Err(err) => {
                    panic!("Failed to create window: {}", err);
                }
            };
        pollster::block_on(self.set_window(window));
    }

    /// Handles window events including input, resize, and close requests.
    ///
    /// Keyboard input is debounced through [`KeyState`]: holding a key down
    /// fires its action exactly once per physical press.
    ///
    /// [`KeyState`]: crate::game::keys::KeyState
    ///
    /// # Panics
    /// - If application state is not initialized
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => {
                panic!("State not initialized");
            }
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; shutting down");
                shutdown(state, event_loop);
            }

            WindowEvent::Resized(new_size) => {
                self.handle_resized(new_size.width, new_size.height);
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: key,
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(game_key) = winit_key_to_game_key(&key) {
                    match key_state {
                        ElementState::Pressed => {
                            if state.key_state.press_key(game_key) {
                                handle_game_key(state, event_loop, game_key);
                            }
                        }
                        ElementState::Released => {
                            state.key_state.release_key(game_key);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let current_time = Instant::now();
                self.handle_frame_timing(current_time);
                self.handle_redraw();
            }

            _ => {}
        }
    }

    /// Handles events forwarded from outside the window, currently only the
    /// Ctrl-C interrupt.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Interrupted => {
                info!("interrupt received; shutting down");
                match self.state.as_mut() {
                    Some(state) => shutdown(state, event_loop),
                    None => event_loop.exit(),
                }
            }
        }
    }
}

/// Applies one debounced key action under the current screen's rules.
fn handle_game_key(state: &mut AppState, event_loop: &ActiveEventLoop, key: GameKey) {
    match state.session.current_screen {
        CurrentScreen::Title => match key {
            GameKey::Begin => {
                state.session.current_screen = CurrentScreen::Game;
            }
            GameKey::Quit => shutdown(state, event_loop),
            _ => {}
        },

        CurrentScreen::Game => {
            let now = Instant::now();
            match key {
                GameKey::MoveForward => {
                    state.session.request_move(MoveStep::Forward, now);
                }
                GameKey::MoveBackward => {
                    state.session.request_move(MoveStep::Backward, now);
                }
                GameKey::RotateCw => {
                    state.session.rotate_cw();
                }
                GameKey::RotateCcw => {
                    state.session.rotate_ccw();
                }
                GameKey::GoUp => {
                    state.session.go_up();
                }
                GameKey::GoDown => {
                    state.session.go_down();
                }
                GameKey::ToggleView => {
                    state.session.corridor_view = !state.session.corridor_view;
                }
                GameKey::ToggleMinimap => {
                    state.session.show_minimap = !state.session.show_minimap;
                }
                GameKey::NewMaze => state.new_session(),
                GameKey::Quit => shutdown(state, event_loop),
                GameKey::Begin => {}
            }
        }

        CurrentScreen::ExitReached => match key {
            GameKey::Quit | GameKey::Begin => shutdown(state, event_loop),
            GameKey::NewMaze => state.new_session(),
            _ => {}
        },
    }
}

/// Persists the path log, flushes GPU work, and exits the event loop.
fn shutdown(state: &mut AppState, event_loop: &ActiveEventLoop) {
    state.persist_path_log();
    state.wgpu_renderer.cleanup();
    event_loop.exit();
}
