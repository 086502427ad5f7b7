pub mod link;
pub mod logging;
pub mod permissions;
