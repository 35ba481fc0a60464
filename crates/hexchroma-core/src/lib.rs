//! hexchroma-core: Core library for hexchroma
//!
//! This crate provides HEX/RGB color conversions, complementary colors,
//! triadic palettes and a small color-name table, plus the HTTP adapter
//! that serves them.
//!
//! # Architecture
//!
//! ```text
//! GET /route?hex=..  →  HexGuard (validate, normalize)  →  ops  →  api payload
//!                                                                    ↓
//!                                                           JSON envelope
//! ```
//!
//! # Modules
//!
//! - `codec`: HEX parsing and HEX ↔ RGB conversion
//! - `hsl`: integer-rounded RGB ↔ HSL
//! - `ops`: the four color operations and the name table
//! - `api`: serializable payloads shared by HTTP and CLI
//! - `config`: Configuration management
//! - `logging`: Structured logging setup
//! - `web`: HTTP server (feature-gated: `web`)
//!
//! # Safety
//!
//! This crate forbids unsafe code.

#![forbid(unsafe_code)]

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod hsl;
pub mod logging;
pub mod ops;
#[cfg(feature = "web")]
pub mod web;

pub use codec::{HexColor, RgbColor};
pub use error::{ColorError, Error, Result};

/// Version of the hexchroma-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
