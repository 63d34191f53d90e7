pub mod api;
pub mod client;
pub mod entities;

pub use client::TraktClient;
