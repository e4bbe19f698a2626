//! Typed async client for the Vauntico Trust Score API.
//!
//! This crate provides:
//! - An authenticated HTTP client with retry and exponential backoff
//! - A typed error taxonomy for transport, protocol and API failures
//! - Typed records for trust scores, trends, features, users and health
//!
//! # Example
//!
//! ```rust,ignore
//! use vauntico_sdk::{Client, ClientConfig, Credentials};
//!
//! let config = ClientConfig::default().with_credentials(Credentials::api_key("vk_live_..."));
//! let client = Client::new(config)?;
//! let score = client.get_trust_score("user-123", Default::default()).await?;
//! println!("{} ({:?})", score.score, score.tier);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod retry;
pub mod types;

pub use client::{Client, FeaturesParams, TrendsParams, TrustScoreParams, UserParams};
pub use config::{ClientConfig, ConfigUpdate, Credentials};
pub use error::{Error, RateLimitInfo, Result};
pub use request::Request;
pub use retry::RetryPolicy;
