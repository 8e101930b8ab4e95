mod client;
mod query;

pub use client::{Lookup, NewsStore};
