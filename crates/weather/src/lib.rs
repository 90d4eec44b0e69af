//! Client side of the historical weather endpoint.

pub mod client;
pub mod contract;
pub mod summary;
pub mod window;

pub use client::*;
pub use contract::*;
pub use summary::*;
pub use window::*;
