// VT Group dialog analyzer - API Core
//
// Turns WhatsApp dialogs into structured task records, or into sales replies
// priced from the company price sheet, via a hosted chat-completion model.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
