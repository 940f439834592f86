//! HTTP API for the guess duel
//!
//! JSON endpoints for the browser client: session control under
//! `/api/game/*` and the match history.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::{create_app, ApiServer};
