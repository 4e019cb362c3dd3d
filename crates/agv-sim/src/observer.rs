//! Observer trait for reporting progress and inspecting fleet state between ticks.

use agv_core::Tick;
use agv_fleet::Fleet;

/// Callbacks invoked by [`crate::Engine::run`] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before arbitration.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick, after kinematics and auto-pilot.
    fn on_tick_end(&mut self, _tick: Tick) {}

    /// Called with read-only access to the fleet whenever the caller takes a
    /// snapshot via [`crate::Engine::snapshot`].
    fn on_snapshot(&mut self, _tick: Tick, _fleet: &Fleet) {}

    /// Called once after [`crate::Engine::run`]'s final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing. Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
