pub mod client;
pub mod document;

pub use client::RegistryClient;
pub use document::{Description, Document, Product};
