//! HTTP layer for the hold'em round engine.
//!
//! Exposes one round per session over a small JSON API: create a
//! session, start a round, submit actions, and poll state. Bot seats
//! are played server side through the policies in `holdem_bot`; hole
//! cards other than the caller's stay face down until a contested
//! showdown.

pub mod errors;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod session;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::init_logging;
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use session::{
    GameStateResponse, SessionError, SessionId, SessionManager, TableConfig,
};
