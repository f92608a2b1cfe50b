//! Escalera - A First-Person Maze Crawler
//!
//! This is the main entry point for the Escalera application. Escalera is a
//! grid-based maze crawler built with Rust and WGPU: mazes are carved by
//! randomized depth-first backtracking across one or more stacked floors, and
//! the player's view is a pseudo-3D corridor built from perspective-scaled
//! 2D slices rather than a true 3D pipeline.
//!
//! # Features
//! - **Procedural Generation**: Perfect mazes with optional loop injection,
//!   reproducible from a `--seed`
//! - **Stacked Floors**: Ladder-linked levels with a key gating the top exit
//! - **Slice Projection**: First-person corridor drawn as flat trapezoids,
//!   plus a top-down map and a corner minimap
//! - **Path Logging**: Every visited cell is recorded and persisted on exit
//!
//! # Architecture
//! - `maze/`: Grid model, generator, and multi-floor orchestration
//! - `game/`: Session state, motion state machine, input mapping, path log
//! - `view/`: GPU-free draw-list builders for all three views
//! - `renderer/`: WGPU plumbing, shape batching, and glyphon text
//! - `app/`: winit application handler and the per-frame update
//!
//! # Usage
//! Run with `cargo run`. See `--help` for maze dimensions, floor count,
//! loop chance, seeding, and the path-log directory.

#![warn(missing_docs)]
pub mod app;
pub mod config;
pub mod game;
pub mod maze;
pub mod renderer;
pub mod view;

use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::{App, AppEvent};
use crate::config::Config;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// Main entry point for the Escalera application.
///
/// Installs the tracing subscriber (verbosity via `RUST_LOG`, default
/// `info`), parses the command line, and blocks on the windowed run.
fn main() -> anyhow::Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    pollster::block_on(run(config))
}

/// Asynchronously runs the application loop.
///
/// Builds the winit event loop with a user-event channel, wires Ctrl-C into
/// it so an interrupt still persists the path log, and hands control to
/// [`App`] until quit.
async fn run(config: Config) -> anyhow::Result<()> {
    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let proxy = event_loop.create_proxy();
    ctrlc::set_handler(move || {
        let _ = proxy.send_event(AppEvent::Interrupted);
    })?;

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
