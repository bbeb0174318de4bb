pub mod submit_ticket;

pub use submit_ticket::*;
