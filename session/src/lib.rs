//! # Session Facade
//!
//! The presentation-layer contract: a top-level switch between the
//! signed-out and signed-in views, and the dashboard that dispatches
//! user intents into the document store and its orchestration layers.
//!
//! No rendering happens here; a UI drives these types and re-renders
//! from the store after each intent.

mod app;
mod dashboard;

pub use app::{App, AppPhase, SignInFailure};
pub use dashboard::Dashboard;
