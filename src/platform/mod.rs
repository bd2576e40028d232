//! Platform bindings
//!
//! The app core is host-agnostic; this is where it meets a real host.
//! - `markup`: HTML fragments for card pages, quiz and story slots
//! - `web`: DOM pages, 2D canvas, browser events and timers (WASM only)
//!
//! Native builds have no display surface and drive the app headless
//! through `port::Recorder` instead.

pub mod markup;

#[cfg(target_arch = "wasm32")]
pub mod web;
