//! Update logic for the Escalera App.
//!
//! Contains the per-frame update and render methods for the App struct.

use crate::game::{CurrentScreen, SessionEvent};
use crate::view::{DrawList, minimap_overlay, project, topdown_view};
use std::time::Instant;
use tracing::{debug, info, warn};
use wgpu;

use super::event_handler::App;

impl App {
    /// Handles the main rendering loop and session updates.
    ///
    /// Called every frame via `RedrawRequested`.
    ///
    /// # Frame Order
    /// 1. Tick the motion clock, finalizing any completed glide
    /// 2. Drain session events (exit reached freezes the session and
    ///    persists the path log immediately)
    /// 3. Refresh HUD text and visibility for the current screen
    /// 4. Project the active view into a draw list and batch it
    /// 5. Prepare text, encode the shape and text passes, submit, present
    pub fn handle_redraw(&mut self) {
        let window = self
            .window
            .as_ref()
            .expect("Window must be initialized before use");
        if window.is_minimized().unwrap_or(false) {
            return;
        }

        let state = self
            .state
            .as_mut()
            .expect("State must be initialized before use");

        let now = Instant::now();
        state.session.tick(now);

        for event in state.session.drain_events() {
            match event {
                SessionEvent::ReachedExit => {
                    info!("exit reached");
                    state.session.current_screen = CurrentScreen::ExitReached;
                    state.persist_path_log();
                }
                SessionEvent::KeyCollected => info!("key collected"),
                SessionEvent::FloorChanged { floor } => info!(floor = floor + 1, "changed floor"),
                SessionEvent::MoveStarted => {}
            }
        }

        state.update_hud();

        let width = state.wgpu_renderer.surface_config.width as f32;
        let height = state.wgpu_renderer.surface_config.height as f32;

        let clear_color = if state.session.current_screen == CurrentScreen::Title {
            wgpu::Color {
                r: 0.08,
                g: 0.09,
                b: 0.11,
                a: 1.0,
            }
        } else {
            wgpu::Color::BLACK
        };

        let mut list = DrawList::new();
        if state.session.current_screen != CurrentScreen::Title {
            let pose = state.session.pose_snapshot(now);
            let key_cell = state.session.key_visible_on(pose.floor);
            let maze = state.session.active_maze();

            if state.session.corridor_view {
                list.extend(project(
                    maze,
                    &pose,
                    key_cell,
                    state.session.exit_locked(),
                    width,
                    height,
                ));
                if state.session.show_minimap {
                    list.extend(minimap_overlay(maze, &pose, key_cell));
                }
            } else {
                list.extend(topdown_view(maze, &pose, key_cell, width, height));
            }

            if state.session.current_screen == CurrentScreen::ExitReached {
                // Frozen scene under a dim overlay; the banner text sits on top.
                list.quad(
                    [[0.0, 0.0], [width, 0.0], [width, height], [0.0, height]],
                    [0.08, 0.09, 0.11, 0.88],
                );
            }
        }

        state.scene.begin(
            &mut state.wgpu_renderer.shape_renderer,
            &mut state.text_renderer,
        );
        state.scene.queue(
            &list,
            &mut state.wgpu_renderer.shape_renderer,
            &mut state.text_renderer,
        );

        if let Err(err) = state.text_renderer.prepare(
            &state.wgpu_renderer.device,
            &state.wgpu_renderer.queue,
            &state.wgpu_renderer.surface_config,
        ) {
            warn!(%err, "failed to prepare text renderer");
        }

        let (surface_texture, surface_view) = match state.wgpu_renderer.get_surface_texture_and_view()
        {
            Ok(result) => result,
            Err(err) => {
                warn!(%err, "skipping frame");
                return;
            }
        };

        let mut encoder = state
            .wgpu_renderer
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        state.wgpu_renderer.render_frame(
            &mut encoder,
            &surface_view,
            clear_color,
            &mut state.text_renderer,
        );

        window.request_redraw();

        state.wgpu_renderer.queue.submit(Some(encoder.finish()));
        surface_texture.present();

        // Keeps surface semaphores from piling up between frames.
        let _ = state.wgpu_renderer.device.poll(wgpu::Maintain::Poll);

        state.text_renderer.trim();
    }

    /// Updates frame timing counters, logging the frame rate once a second.
    pub fn handle_frame_timing(&mut self, current_time: Instant) {
        if let Some(state) = self.state.as_mut() {
            state.frame_count += 1;

            let duration = current_time.duration_since(state.last_fps_time);
            if duration.as_secs_f32() >= 1.0 {
                debug!(fps = state.frame_count, "frame rate");
                state.frame_count = 0;
                state.last_fps_time = current_time;
            }
        }
    }
}
