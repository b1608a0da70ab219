pub mod client;
pub mod parse;
pub mod provider;

pub use client::AdbClient;
pub use provider::AdbProvider;
