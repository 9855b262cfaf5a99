//! Chat widget controller and its event loop.
//!
//! # Architecture
//!
//! - [`ChatWidget`]: compose → send → await → render, plus "new chat"
//! - [`runtime`]: the single event loop that feeds UI commands and settled
//!   replies into the controller
//!
//! The widget has two interaction states. *Idle* means input is enabled.
//! *Awaiting-reply* means input is disabled and the typing placeholder is
//! shown. Submitting moves idle to awaiting-reply; the request settling
//! moves it back, whatever the outcome.

mod controller;
pub mod runtime;

pub use controller::{ChatWidget, PendingReply, SettledReply, WidgetSettings};
pub use runtime::{WidgetCommand, WidgetHandle, run_widget, spawn_widget};
