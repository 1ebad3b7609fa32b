//! Customer-support orchestration: classify the message, resolve any ticket
//! intent against the store, analyse sentiment, then draft the reply.

pub mod analysis;
pub mod graph;
pub mod intent;
pub mod respond;
pub mod state;
pub mod ticket;

pub use graph::{SupportOutcome, run_support_graph};
pub use ticket::TicketAction;

#[cfg(test)]
mod tests;
