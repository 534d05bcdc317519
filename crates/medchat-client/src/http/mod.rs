mod client;
mod wire;

pub use client::HttpChatApi;
