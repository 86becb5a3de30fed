//! Dispatch - per-category fan-out under a concurrent or sequential strategy.

mod dispatcher;
mod strategy;
mod worker;

pub use dispatcher::{CategoryDispatcher, DispatchReport};
pub use strategy::{
    strategy_for, ConcurrentDispatch, DispatchMode, DispatchStrategy, SequentialDispatch,
};
pub use worker::{fallback_query, CategoryJob, CategoryOutcome, CategoryWorker};
