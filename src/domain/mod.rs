pub mod diagram;
pub mod measurements;
pub mod models;
pub mod position;
pub mod session;
pub mod settings;
