// Adapters layer: concrete implementations of the domain ports.

pub mod printful;

pub use printful::PrintfulClient;
