//! Async services over the store: clock control, the start guard, goals, viewer reconcilers.

mod control;
mod goals;
mod guard;
mod reconciler;

pub use control::MatchControl;
pub use goals::GoalDesk;
pub use guard::{NoGuard, SameSportGuard, StartGuard};
pub use reconciler::{ClockNotice, Reconciler, ReconcilerHandle, TICK};
