//! Query/update facade for the web dashboard.
//!
//! Many callers (browser tabs) may hit the service at once; every
//! read-modify-write against a given snapshot file runs under that file's
//! lock so overlapping increments never interleave and never lose an
//! update. Requests travel as newline-delimited JSON over TCP (see
//! `larder_protocol::wire`).

pub mod client;
pub mod server;
pub mod service;

pub use client::DashboardClient;
pub use server::{DashboardError, DashboardServer};
pub use service::DashboardService;
