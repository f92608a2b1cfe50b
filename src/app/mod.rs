//! Application module for Escalera.
//!
//! This module contains the windowing shell that drives a maze session: the
//! winit [`ApplicationHandler`](winit::application::ApplicationHandler)
//! implementation, the per-session state bundle, and the per-frame update
//! and render path.
//!
//! # Module Structure
//!
//! - [`app_state`]: Contains the [`AppState`] struct which holds all running state
//! - [`event_handler`]: Contains the [`App`] struct and event handling logic
//! - [`update`]: Contains the per-frame update loop and rendering logic
//!
//! # Event Flow
//!
//! 1. **Input Events**: Window events are mapped to game actions and applied
//!    to the session
//! 2. **State Updates**: Each redraw ticks the motion clock and drains
//!    session events
//! 3. **Rendering**: The active view is projected into a draw list and
//!    painted in two passes (shapes, then text)
//!
//! All state mutation happens on the event-loop thread; the session itself
//! never blocks on I/O, and the path log is persisted only at session end.

pub mod app_state;
pub mod event_handler;
pub mod update;

pub use app_state::AppState;
pub use event_handler::{App, AppEvent};
