pub mod config;
pub mod llm;
pub mod support;
pub mod terminal;
pub mod tickets;
