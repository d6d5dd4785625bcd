//! Product catalog client for Rust.
//!
//! Talks to a remote JSON product API (a local REST server, a JSON document
//! store, or a hosted REST backend), keeps an in-memory product list in sync
//! with the server's responses, filters it client-side and renders it to
//! markup.
//!
//! # Quick start
//!
//! ```no_run
//! use catalog_client::{CatalogClient, ProductId};
//!
//! let mut client = CatalogClient::builder().build().unwrap();
//! client.load().unwrap();
//!
//! // Client-side filtering
//! let markup = client.search("widget").to_string();
//!
//! // Bump a product's stock
//! client.increase_stock(&ProductId::from(7)).unwrap();
//! ```

pub mod api;
#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod form;
pub mod interaction;
pub mod models;
pub mod notify;
pub mod prefs;
pub mod render;
pub mod state;

pub use api::{CatalogApi, HttpApi};
#[cfg(feature = "async")]
pub use async_client::AsyncCatalogClient;
pub use client::{CatalogClient, CatalogClientBuilder, EditOutcome, StockOutcome};
pub use config::{Backend, ClientConfig};
pub use error::{CatalogError, Result};
pub use filter::ActiveFilter;
pub use form::ProductForm;
pub use interaction::{Interaction, TerminalInteraction};
pub use models::{NewProduct, Product, ProductEdit, ProductId, StockPatch};
pub use prefs::{PreferenceStore, Theme};
pub use state::ReconcilePolicy;
