//! `reqwest` implementation of [`ChatApi`](crate::ChatApi).

mod client;

#[cfg(test)]
mod tests;

pub use client::HttpChatApi;
