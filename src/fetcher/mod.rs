// src/fetcher/mod.rs
// =============================================================================
// This module retrieves pages and probes link targets over HTTP.
//
// Submodules:
// - http: the reqwest-backed Fetcher and its error taxonomy
//
// One Fetcher is created per run and shared (by cloning) between the
// orchestrator and the link validation check. It holds no per-URL state, so
// any number of requests can go through it at once.
// =============================================================================

mod http;

pub use http::{FetchError, FetchedPage, Fetcher};
