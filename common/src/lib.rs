//! Types shared by the minesweeper server and its clients.
//!
//! `models` holds what the server sends back (game views, scores), and
//! `protocol` holds the request bodies accepted by the HTTP API.

pub mod models;
pub mod protocol;
