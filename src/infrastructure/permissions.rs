//! Startup radio-permission hook.
//!
//! Reading the bonded-device list needs no runtime grant on Linux, so today
//! this only logs. It is called once at startup, fire and forget, and is the
//! single place a platform grant request would go.

use tracing::debug;

pub fn request_radio_access() {
    debug!("no runtime radio permission grant required on this platform");
}
