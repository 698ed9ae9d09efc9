pub mod access;
pub mod admin;
pub mod chat;
pub mod code;
pub mod recipient;
pub mod shop;
