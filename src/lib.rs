//! # Buzon (Contact Form Relay)
//!
//! `buzon` is a small HTTP service that accepts contact-form submissions,
//! verifies the attached Cloudflare Turnstile token, and relays the message
//! to the EmailJS delivery API.
//!
//! The service keeps no state. Each request is validated, verified, relayed,
//! and answered independently; the only process-wide data is the read-only
//! configuration captured at startup.
//!
//! ## Request contract
//!
//! - `OPTIONS` (any path): CORS preflight, `204`.
//! - `POST` (any path): validation pipeline, Turnstile check, EmailJS relay.
//! - anything else: `405 Method not allowed`.
//!
//! Validation failures answer with a precise reason (`400`); anything that
//! goes wrong past validation collapses into an opaque `500 Server error` so
//! upstream provider details never leak to the caller.

pub mod cli;
pub mod relay;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
