//! Bluetooth Classic link to the positioner.
//!
//! The actor in [`manager`] owns the socket lifecycle; everything UI-visible
//! leaves it as [`crate::domain::models::AppEvent`]s.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     LinkManager                       │
//! │   (actor - single writer of socket and link state)    │
//! └──────────┬──────────────┬──────────────┬─────────────┘
//!            │              │              │
//!            ▼              ▼              ▼
//!     ┌───────────┐  ┌────────────┐  ┌───────────┐
//!     │   codec   │  │  framing   │  │ transport │
//!     │           │  │            │  │           │
//!     │ - &R/L015 │  │ - newline  │  │ - traits  │
//!     │   frames  │  │   frames   │  │ - bluez   │
//!     └───────────┘  └────────────┘  └───────────┘
//! ```
//!
//! ## Modules
//!
//! - [`codec`] - fixed 5-byte wire encoding of motion commands
//! - [`framing`] - reassembly of the peer's newline-delimited responses
//! - [`transport`] - capability traits the actor is written against
//! - [`bluez`] - BlueZ-backed transport (bonded lookup + RFCOMM stream)
//! - [`manager`] - the link actor and its reader task

pub mod bluez;
pub mod codec;
pub mod framing;
pub mod manager;
pub mod transport;

pub use manager::{LinkConfig, LinkManager};
