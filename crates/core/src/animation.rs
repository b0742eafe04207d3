//! Animation loop: tick the color cycle and stream it to one notifier.
//!
//! Send failures never stop the loop. Only the [`RunControl`] decides when
//! the animation ends, and it is consulted before every tick.

use crate::config::AnimationConfig;
use crate::cycle::ColorCycler;
use crate::transport::{send_color, HidTransport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Decides whether another tick should run.
pub trait RunControl {
    fn should_continue(&mut self) -> bool;
}

impl<F: FnMut() -> bool> RunControl for F {
    fn should_continue(&mut self) -> bool {
        self()
    }
}

/// Cancellation flag shared with a signal handler.
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    stopped: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the animation to stop after the current tick.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

impl RunControl for StopFlag {
    fn should_continue(&mut self) -> bool {
        !self.is_stopped()
    }
}

/// Allows a fixed number of ticks.
#[derive(Debug, Clone, Copy)]
pub struct TickBudget {
    remaining: u64,
}

impl TickBudget {
    pub fn new(ticks: u64) -> Self {
        Self { remaining: ticks }
    }
}

impl RunControl for TickBudget {
    fn should_continue(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Summary of a finished animation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationStats {
    /// Ticks executed (one color report attempted per tick).
    pub ticks: u64,
    /// Color reports the transport rejected.
    pub send_failures: u64,
}

/// Run the color cycle on `transport` until `control` says stop.
pub fn run_animation(
    transport: &dyn HidTransport,
    cycler: &mut ColorCycler,
    config: &AnimationConfig,
    control: &mut dyn RunControl,
) -> AnimationStats {
    info!(
        tick_delay_ms = config.tick_delay.as_millis() as u64,
        white_point = ?config.white_point,
        "Starting color cycle"
    );

    let mut stats = AnimationStats::default();
    let mut failing = false;

    while control.should_continue() {
        let leg = cycler.leg();
        let color = cycler.tick();
        if cycler.leg() != leg {
            debug!(leg = cycler.leg().index(), "Color cycle leg change");
        }

        match send_color(transport, color, config.white_point) {
            Ok(()) => {
                if failing {
                    info!(tick = stats.ticks, "Color reports accepted again");
                    failing = false;
                }
            }
            Err(e) => {
                stats.send_failures += 1;
                if failing {
                    debug!(tick = stats.ticks, error = %e, "Color report failed");
                } else {
                    warn!(tick = stats.ticks, error = %e, "Color report failed");
                    failing = true;
                }
            }
        }
        stats.ticks += 1;

        if !config.tick_delay.is_zero() {
            thread::sleep(config.tick_delay);
        }
    }

    info!(
        ticks = stats.ticks,
        send_failures = stats.send_failures,
        "Color cycle stopped"
    );
    stats
}
