//! Session identity for a widget instance.
//!
//! The widget owns a [`SessionContext`] instead of a module-level variable.
//! The server is the source of truth for any conversation state keyed by the
//! identifier; the client only mints and forwards it.
//!
//! # Example
//!
//! ```rust
//! use chat_widget::session::SessionContext;
//!
//! let mut ctx = SessionContext::new();
//! let before = ctx.current().clone();
//! let retired = ctx.renew();
//!
//! assert_eq!(retired, before);
//! assert_ne!(ctx.current(), &before);
//! ```

mod id;

pub use id::{SessionContext, SessionId};
