pub mod client;
pub mod peers;

pub use client::PeerClient;
pub use peers::{PeerRegistry, normalize_address};
