//! Payment provider gateway.
//!
//! Wraps the Paddle classic vendor API: given a product id, generates a
//! hosted checkout URL. Also carries the client-token configuration the
//! front end can use to open an inline checkout when no server-side vendor
//! credentials are present.

mod client;
mod config;

pub use client::CheckoutClient;
pub use config::CheckoutConfig;
