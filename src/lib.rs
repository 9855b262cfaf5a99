//! Chat widget controller
//!
//! A client for a remote chat service: it renders messages, posts user input,
//! shows a typing indicator while the reply is pending, and starts new
//! conversations.
//!
//! # Architecture
//!
//! - **Widget**: event-driven controller over a render surface
//! - **Transport**: two JSON HTTP operations, `/chat` and `/new-chat`
//! - **Surface**: in-memory render tree and a terminal renderer
//!
//! # Modules
//!
//! - [`config`]: layered CLI/env/file configuration
//! - [`session`]: session identifier generation and ownership
//! - [`surface`]: render surface trait and implementations
//! - [`transport`]: chat service client
//! - [`widget`]: controller and event loop

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod session;
pub mod surface;
pub mod transport;
pub mod widget;
