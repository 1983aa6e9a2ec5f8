//! Query orchestration for a TMDB-backed movie browser.
//!
//! Turns search text, sort order, genre filters and page requests into
//! allowlisted catalog requests and reduces the responses into a single
//! observable [`services::QuerySnapshot`].

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
