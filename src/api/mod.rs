//! Client for the hosted data service: content catalog reads and
//! activity/play-count reporting writes.

pub mod client;
pub mod models;

pub use client::*;
pub use models::*;
