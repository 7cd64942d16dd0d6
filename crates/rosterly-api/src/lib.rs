// rosterly-api: Async Rust client for the rosterly member-roster service

pub mod auth;
pub mod cards;
pub mod client;
pub mod error;
pub mod groups;
pub mod models;
pub mod person;
pub mod transport;
pub mod users;

pub use client::RosterClient;
pub use error::Error;
