//! sea-orm entity definitions for the gift service tables.

pub mod chat_messages;
pub mod chat_subscribers;
pub mod codes;
pub mod orders;
pub mod products;
pub mod shops;
