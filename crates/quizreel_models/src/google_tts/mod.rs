//! Google Cloud Text-to-Speech backend.

mod client;
mod dto;
mod wav;

pub use client::GoogleSpeechBackend;
