pub mod client;
pub mod outfit;
pub mod types;

pub use client::GeminiHttpClient;
pub use outfit::GeminiOutfitClient;
