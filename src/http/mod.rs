//! HTTP client layer: `WikiPricesHttp`, a single-attempt time-series fetcher.

pub mod client;

pub use client::WikiPricesHttp;
