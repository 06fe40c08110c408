#![forbid(unsafe_code)]

//! driftwatch terminal front end.
//!
//! - [`app`] - Run setup, error type and exit codes
//! - [`cli`] - Flag and environment parsing
//! - [`render`] - Terminal sinks ([`render::TextSink`], [`render::ChartSink`])

pub mod app;
pub mod cli;
pub mod render;
