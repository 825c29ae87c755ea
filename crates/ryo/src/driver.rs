//! # Frame Driver
//!
//! Headless frame loop that emits every [`GameEvents`] channel in a fixed
//! order:
//!
//! 1. `load`, then `resize` with the configured initial size
//! 2. per frame: queued input (key, mouse, resize) in arrival order, `update`
//!    in parallel, `render` sequentially
//! 3. when a stop is requested or the frame limit is hit: `close`, which
//!    handlers may veto
//! 4. `unload`
//!
//! Any handler failure ends the run: the driver does not try to carry on
//! with a frame that is missing some subscriber's contribution.

use crate::config::FrameSettings;
use crate::game_events::{
    Close, CloseFlag, GameEvents, KeyDown, KeyUp, Load, MouseDown, MouseMove, MouseUp, Render,
    Resize, Unload, Update,
};
use crate::input::{InputEvent, Vec2};
use crate::shutdown::ShutdownHandle;
use crossbeam::channel::{self, Receiver, Sender};
use ryo_event::{EventError, SenderId};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Dispatch failure that stopped the frame loop.
#[derive(Debug, thiserror::Error)]
#[error("frame {frame}: {source}")]
pub struct DriverError {
    pub frame: u64,
    #[source]
    pub source: EventError,
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A shutdown request was accepted by every close handler
    Requested,
    /// The configured frame limit was reached
    FrameLimit,
    /// Close handlers vetoed more requests than allowed
    VetoLimit,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    /// Sum of every update's delta time, in seconds
    pub simulated_time: f64,
    /// Close requests a handler vetoed, including one that hit the veto limit
    pub vetoed_closes: u32,
    pub reason: StopReason,
}

pub struct FrameDriver {
    events: Arc<GameEvents>,
    sender: SenderId,
    settings: FrameSettings,
    shutdown: ShutdownHandle,
    input_tx: Sender<InputEvent>,
    input_rx: Receiver<InputEvent>,
    cursor: Vec2,
    frame: u64,
}

impl FrameDriver {
    pub fn new(events: Arc<GameEvents>, settings: FrameSettings, shutdown: ShutdownHandle) -> Self {
        let (input_tx, input_rx) = channel::unbounded();
        Self {
            events,
            sender: SenderId::new(),
            settings,
            shutdown,
            input_tx,
            input_rx,
            cursor: Vec2::ZERO,
            frame: 0,
        }
    }

    pub fn events(&self) -> &Arc<GameEvents> {
        &self.events
    }

    /// Identity passed to every handler as the sender.
    pub fn sender(&self) -> SenderId {
        self.sender
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Queue for platform input; drained at the start of each frame.
    pub fn input_sender(&self) -> Sender<InputEvent> {
        self.input_tx.clone()
    }

    /// Runs the loop until a close goes through, then emits `unload`.
    pub fn run(&mut self) -> Result<RunSummary, DriverError> {
        info!(
            "▶️ Frame loop starting ({} fps, frame limit {})",
            self.settings.target_fps, self.settings.max_frames
        );

        self.emit(|events, sender| events.load.invoke(sender, Load))?;
        let initial = Resize {
            width: self.settings.width,
            height: self.settings.height,
        };
        self.emit(|events, sender| events.resize.invoke(sender, initial))?;

        let frame_budget = match self.settings.target_fps {
            0 => None,
            fps => Some(Duration::from_secs_f64(1.0 / f64::from(fps))),
        };

        let mut simulated_time = 0.0;
        let mut vetoed_closes = 0;
        let mut last_tick = Instant::now();

        let reason = loop {
            let frame_start = Instant::now();
            self.pump_input()?;

            let update = Update {
                delta_time: frame_start.duration_since(last_tick).as_secs_f64(),
                frame: self.frame,
            };
            last_tick = frame_start;
            simulated_time += update.delta_time;

            self.emit(|events, sender| events.update.invoke_parallel(sender, update))?;
            let render = Render { frame: self.frame };
            self.emit(|events, sender| events.render.invoke(sender, render))?;
            self.frame += 1;

            let limit_hit = self.settings.max_frames > 0 && self.frame >= self.settings.max_frames;
            if limit_hit || self.shutdown.is_requested() {
                let accepted = self.request_close()?;
                if !accepted {
                    vetoed_closes += 1;
                }
                if limit_hit {
                    break StopReason::FrameLimit;
                }
                if accepted {
                    break StopReason::Requested;
                }
                if vetoed_closes > self.settings.veto_limit {
                    warn!("⚠️ Close vetoed {} times, forcing shutdown", vetoed_closes);
                    break StopReason::VetoLimit;
                }
                self.shutdown.clear();
                info!("↩️ Close vetoed by a handler, continuing");
            }

            if let Some(budget) = frame_budget {
                let elapsed = frame_start.elapsed();
                if elapsed < budget {
                    std::thread::sleep(budget - elapsed);
                }
            }
        };

        self.emit(|events, sender| events.unload.invoke(sender, Unload))?;

        let summary = RunSummary {
            frames: self.frame,
            simulated_time,
            vetoed_closes,
            reason,
        };
        info!(
            "⏹️ Frame loop stopped after {} frames ({:.2}s simulated, {:?})",
            summary.frames, summary.simulated_time, summary.reason
        );
        Ok(summary)
    }

    /// Emits `close` and reports whether every handler let it through.
    fn request_close(&self) -> Result<bool, DriverError> {
        let flag = CloseFlag::new(true);
        let close = Close {
            should_close: flag.clone(),
        };
        self.emit(|events, sender| events.close.invoke(sender, close))?;
        Ok(flag.should_close())
    }

    /// Dispatches the input queued when the pump starts, in arrival order.
    /// Input sent by handlers during the pump waits for the next frame.
    fn pump_input(&mut self) -> Result<(), DriverError> {
        let queued = self.input_rx.len();
        for _ in 0..queued {
            let Ok(input) = self.input_rx.try_recv() else {
                break;
            };
            debug!("⌨️ Input: {:?}", input);
            match input {
                InputEvent::KeyPressed { key, modifiers } => {
                    self.emit(|events, sender| events.key_down.invoke(sender, KeyDown { key, modifiers }))?;
                }
                InputEvent::KeyReleased { key, modifiers } => {
                    self.emit(|events, sender| events.key_up.invoke(sender, KeyUp { key, modifiers }))?;
                }
                InputEvent::MousePressed { button, modifiers } => {
                    let down = MouseDown {
                        position: self.cursor,
                        button,
                        modifiers,
                    };
                    self.emit(|events, sender| events.mouse_down.invoke(sender, down))?;
                }
                InputEvent::MouseReleased { button, modifiers } => {
                    let up = MouseUp {
                        position: self.cursor,
                        button,
                        modifiers,
                    };
                    self.emit(|events, sender| events.mouse_up.invoke(sender, up))?;
                }
                InputEvent::CursorMoved(position) => {
                    let moved = MouseMove {
                        position,
                        delta: position - self.cursor,
                    };
                    self.cursor = position;
                    self.emit(|events, sender| events.mouse_move.invoke(sender, moved))?;
                }
                InputEvent::Resized { width, height } => {
                    self.emit(|events, sender| events.resize.invoke(sender, Resize { width, height }))?;
                }
                InputEvent::CloseRequested => self.shutdown.request(),
            }
        }
        Ok(())
    }

    fn emit<F>(&self, dispatch: F) -> Result<(), DriverError>
    where
        F: FnOnce(&GameEvents, SenderId) -> Result<(), EventError>,
    {
        dispatch(&self.events, self.sender).map_err(|source| {
            error!("❌ Frame {} aborted: {}", self.frame, source);
            DriverError {
                frame: self.frame,
                source,
            }
        })
    }
}
