pub mod providers;
pub mod support;
pub mod tickets;
