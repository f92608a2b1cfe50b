//! AppState module for Escalera.
//!
//! This module defines the [`AppState`] struct, which holds all state required
//! for a running session: the rendering backends, the game session, input
//! state, and the parsed configuration.

use crate::config::Config;
use crate::game::{CurrentScreen, GameSession, keys::KeyState};
use crate::maze::LevelSet;
use crate::renderer::scene::SceneQueue;
use crate::renderer::text::{TextPosition, TextRenderer, TextStyle};
use crate::renderer::wgpu_lib::WgpuRenderer;
use glyphon::{Color, Resolution, Weight};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use tracing::{error, info};
use winit::window::Window;

/// Holds all state required for a running Escalera session.
///
/// This includes rendering backends, the game session, input state, and the
/// RNG that seeds every generated level.
pub struct AppState {
    /// The WGPU renderer for the corridor and map geometry.
    pub wgpu_renderer: WgpuRenderer,
    /// The text renderer for HUD lines, labels, and banners.
    pub text_renderer: TextRenderer,
    /// Per-frame dispatcher from draw lists into the renderers.
    pub scene: SceneQueue,
    /// The active game session (level, pose, key state, path log).
    pub session: GameSession,
    /// The current input state (pressed keys).
    pub key_state: KeyState,
    /// Parsed command-line configuration.
    pub config: Config,
    /// Level-generation RNG; successive `N` presses draw from this stream.
    pub rng: ChaCha8Rng,
    /// True once the current session's path log has hit disk.
    pub log_saved: bool,
    /// Frames rendered since the last frame-rate log line.
    pub frame_count: u32,
    /// When the frame counter was last reset.
    pub last_fps_time: Instant,
}

impl AppState {
    /// Asynchronously creates a new [`AppState`] with initialized renderers
    /// and a freshly generated level.
    ///
    /// # Arguments
    /// - `instance`: The WGPU instance.
    /// - `surface`: The WGPU surface for rendering.
    /// - `window`: The application window.
    /// - `width`: Initial window width.
    /// - `height`: Initial window height.
    /// - `config`: Parsed command-line configuration.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        window: &Window,
        width: u32,
        height: u32,
        config: Config,
    ) -> Self {
        let wgpu_renderer = WgpuRenderer::new(instance, surface, width, height).await;

        let mut text_renderer = TextRenderer::new(
            &wgpu_renderer.device,
            &wgpu_renderer.queue,
            wgpu_renderer.surface_config.format,
            window,
        );

        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, "seeding level generation");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let session = build_session(&config, &mut rng);

        create_hud(&mut text_renderer, width as f32, height as f32);

        Self {
            wgpu_renderer,
            text_renderer,
            scene: SceneQueue::new(),
            session,
            key_state: KeyState::default(),
            config,
            rng,
            log_saved: false,
            frame_count: 0,
            last_fps_time: Instant::now(),
        }
    }

    /// Discards the current session and starts over on a fresh level drawn
    /// from the same RNG stream. Skips the title screen.
    pub fn new_session(&mut self) {
        info!("generating a fresh level");
        self.session = build_session(&self.config, &mut self.rng);
        self.session.current_screen = CurrentScreen::Game;
        self.log_saved = false;
    }

    /// Writes the session's path log under the configured directory.
    ///
    /// Saving is one-shot per session: reaching the exit persists the log
    /// immediately, and a later quit or close finds `log_saved` already set.
    /// Failures are logged and never block shutdown.
    pub fn persist_path_log(&mut self) {
        if self.log_saved {
            return;
        }
        match self.session.path_log.save_to_dir(&self.config.log_dir) {
            Ok(path) => {
                info!(path = %path.display(), "path log saved");
                self.log_saved = true;
            }
            Err(err) => error!(%err, "failed to save path log"),
        }
    }

    /// Resizes the WGPU surface and updates the configuration.
    ///
    /// # Arguments
    /// - `width`: New width of the surface.
    /// - `height`: New height of the surface.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.wgpu_renderer.surface_config.width = width;
        self.wgpu_renderer.surface_config.height = height;
        self.wgpu_renderer.surface.configure(
            &self.wgpu_renderer.device,
            &self.wgpu_renderer.surface_config,
        );

        self.wgpu_renderer
            .shape_renderer
            .resize(width as f32, height as f32);
        self.text_renderer
            .resize(&self.wgpu_renderer.queue, Resolution { width, height });
        layout_hud(&mut self.text_renderer, width as f32, height as f32);
    }

    /// Updates HUD text and visibility for the current screen.
    ///
    /// The floor and key lines only exist during play; the key line also
    /// hides entirely on single-floor sessions, which have no key.
    pub fn update_hud(&mut self) {
        let screen = self.session.current_screen;
        let on_title = screen == CurrentScreen::Title;
        let in_game = screen == CurrentScreen::Game;
        let at_exit = screen == CurrentScreen::ExitReached;

        self.set_visible("title", on_title);
        self.set_visible("title_help", on_title);
        self.set_visible("banner", at_exit);
        self.set_visible("banner_help", at_exit);

        let key_line = if self.session.has_key() {
            Some("Key: found")
        } else if self.session.exit_locked() {
            Some("Key: missing")
        } else {
            None
        };

        self.set_visible("hud_floor", in_game);
        self.set_visible("hud_help", in_game);
        self.set_visible("hud_key", in_game && key_line.is_some());

        if in_game {
            let floor_line = format!(
                "Floor {}/{}",
                self.session.active_floor() + 1,
                self.session.levels().n_floors()
            );
            let _ = self.text_renderer.update_text("hud_floor", &floor_line);
            if let Some(line) = key_line {
                let _ = self.text_renderer.update_text("hud_key", line);
            }
        }
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(buf) = self.text_renderer.text_buffers.get_mut(id) {
            buf.visible = visible;
        }
    }
}

/// Generates a level from the configuration and wraps it in a session.
fn build_session(config: &Config, rng: &mut ChaCha8Rng) -> GameSession {
    let levels = LevelSet::generate(
        config.floors,
        config.rows,
        config.cols,
        config.allow_loops(),
        config.effective_loop_chance(),
        rng,
    );
    info!(floors = levels.n_floors(), "level generated");
    GameSession::new(levels)
}

/// Creates every persistent HUD text buffer. Only the title lines start
/// visible; `AppState::update_hud` flips the rest per screen.
fn create_hud(text: &mut TextRenderer, width: f32, height: f32) {
    let entries: [(&str, &str, TextStyle); 7] = [
        (
            "title",
            "ESCALERA",
            TextStyle {
                font_size: 96.0,
                line_height: 104.0,
                color: Color::rgb(235, 235, 240),
                weight: Weight::BOLD,
            },
        ),
        (
            "title_help",
            "Press Enter to begin",
            TextStyle {
                font_size: 28.0,
                line_height: 34.0,
                color: Color::rgb(170, 175, 185),
                weight: Weight::NORMAL,
            },
        ),
        (
            "hud_floor",
            "Floor 1/1",
            TextStyle {
                font_size: 20.0,
                line_height: 24.0,
                color: Color::rgb(255, 255, 255),
                weight: Weight::BOLD,
            },
        ),
        (
            "hud_key",
            "Key: missing",
            TextStyle {
                font_size: 20.0,
                line_height: 24.0,
                color: Color::rgb(218, 165, 32),
                weight: Weight::NORMAL,
            },
        ),
        (
            "hud_help",
            "Move: W/S or arrows   Turn: A/D   Climb: E/C   Map: V   Minimap: M   New maze: N   Quit: Q",
            TextStyle {
                font_size: 16.0,
                line_height: 20.0,
                color: Color::rgb(150, 153, 160),
                weight: Weight::NORMAL,
            },
        ),
        (
            "banner",
            "You found the exit!",
            TextStyle {
                font_size: 56.0,
                line_height: 64.0,
                color: Color::rgb(255, 224, 120),
                weight: Weight::BOLD,
            },
        ),
        (
            "banner_help",
            "Press Enter or Q to quit, N for a new maze",
            TextStyle {
                font_size: 24.0,
                line_height: 30.0,
                color: Color::rgb(210, 212, 220),
                weight: Weight::NORMAL,
            },
        ),
    ];

    for (id, content, style) in entries {
        text.create_text_buffer(id, content, Some(style), None);
    }
    layout_hud(text, width, height);

    for id in ["hud_floor", "hud_key", "hud_help", "banner", "banner_help"] {
        if let Some(buf) = text.text_buffers.get_mut(id) {
            buf.visible = false;
        }
    }
}

/// Positions every HUD buffer for the given window size. Centered lines use
/// conservative width estimates rather than measured text.
fn layout_hud(text: &mut TextRenderer, width: f32, height: f32) {
    let centered = |est: f32| (width - est) / 2.0;

    let positions: [(&str, TextPosition); 7] = [
        (
            "title",
            TextPosition {
                x: centered(470.0),
                y: height * 0.26,
                max_width: Some(480.0),
                max_height: Some(110.0),
            },
        ),
        (
            "title_help",
            TextPosition {
                x: centered(280.0),
                y: height * 0.26 + 150.0,
                max_width: Some(300.0),
                max_height: Some(40.0),
            },
        ),
        (
            "hud_floor",
            TextPosition {
                x: 16.0,
                y: 12.0,
                max_width: Some(220.0),
                max_height: Some(28.0),
            },
        ),
        (
            "hud_key",
            TextPosition {
                x: 16.0,
                y: 40.0,
                max_width: Some(240.0),
                max_height: Some(28.0),
            },
        ),
        (
            "hud_help",
            TextPosition {
                x: 16.0,
                y: height - 36.0,
                max_width: Some(width - 32.0),
                max_height: Some(24.0),
            },
        ),
        (
            "banner",
            TextPosition {
                x: centered(560.0),
                y: height * 0.34,
                max_width: Some(580.0),
                max_height: Some(70.0),
            },
        ),
        (
            "banner_help",
            TextPosition {
                x: centered(440.0),
                y: height * 0.34 + 84.0,
                max_width: Some(460.0),
                max_height: Some(36.0),
            },
        ),
    ];

    for (id, position) in positions {
        let _ = text.update_position(id, position);
    }
}
