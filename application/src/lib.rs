pub mod chat_service;
pub mod session_registry;
