//! spaserve - a local development HTTP server.
//!
//! Serves a directory with browser caching disabled on every response, and
//! rewrites deep links under a configured prefix to that prefix's index file
//! so single-page applications can handle their own routing. An optional
//! live-reload side channel pushes reload commands to connected clients
//! over WebSocket when files change.

pub mod config;
pub mod handler;
pub mod http;
pub mod livereload;
pub mod logger;
pub mod server;
