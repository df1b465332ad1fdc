pub mod conversation;
pub mod document;
pub mod error;
pub mod ports;
pub mod prompt;
pub mod session;
