//! HTTP collaborator: the remote product API the client talks to.
//!
//! [`CatalogApi`] is the seam between the client's state handling and the
//! network. [`HttpApi`] is the reqwest-backed implementation; tests swap in
//! a scripted fake.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::Backend;
use crate::envelope;
use crate::error::{CatalogError, Result};
use crate::models::{NewProduct, Product, ProductId, StockPatch};

/// The five operations of the remote product API.
pub trait CatalogApi {
    /// Fetch the full collection.
    fn list(&self) -> Result<Vec<Product>>;

    /// Create a product. Returns the server's representation, with its id.
    fn create(&self, product: &NewProduct) -> Result<Product>;

    /// Partially update a product's stock.
    fn patch_stock(&self, id: &ProductId, patch: &StockPatch) -> Result<Product>;

    /// Replace every field of an existing product.
    fn replace(&self, product: &Product) -> Result<Product>;

    /// Delete a product.
    fn delete(&self, id: &ProductId) -> Result<()>;
}

// ---------------------------------------------------------------------------
// HttpApi
// ---------------------------------------------------------------------------

/// Blocking reqwest implementation of [`CatalogApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    backend: Backend,
    collection_url: String,
    credential: Option<(&'static str, String)>,
    client: Client,
}

impl HttpApi {
    /// Build an API handle for `collection_url`.
    ///
    /// `timeout` of `None` means requests never time out.
    pub fn new(
        backend: Backend,
        collection_url: impl Into<String>,
        api_key: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            backend,
            collection_url: collection_url.into().trim_end_matches('/').to_string(),
            credential: api_key.and_then(|key| backend.credential_header(key)),
            client,
        })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    pub fn item_url(&self, id: &ProductId) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.credential {
            Some((name, value)) => req.header(*name, value),
            None => req,
        }
    }

    fn send(&self, method: &str, url: &str, req: RequestBuilder) -> Result<Response> {
        debug!(method, url, backend = %self.backend, "sending request");
        let resp = self.authorize(req).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(resp)
    }

    fn send_json_body<B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: &B,
    ) -> Result<Product> {
        let req = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?);
        let payload: Value = self.send(method.as_str(), url, req)?.json()?;
        envelope::decode_item(self.backend, payload)
    }
}

impl CatalogApi for HttpApi {
    fn list(&self) -> Result<Vec<Product>> {
        let url = self.collection_url.as_str();
        let payload: Value = self.send("GET", url, self.client.get(url))?.json()?;
        envelope::decode_collection(self.backend, payload)
    }

    fn create(&self, product: &NewProduct) -> Result<Product> {
        self.send_json_body(reqwest::Method::POST, &self.collection_url, product)
    }

    fn patch_stock(&self, id: &ProductId, patch: &StockPatch) -> Result<Product> {
        if self.backend.stock_patch_in_body() {
            let body = StockPatch {
                id: Some(id.clone()),
                ..patch.clone()
            };
            self.send_json_body(reqwest::Method::PATCH, &self.collection_url, &body)
        } else {
            self.send_json_body(reqwest::Method::PATCH, &self.item_url(id), patch)
        }
    }

    fn replace(&self, product: &Product) -> Result<Product> {
        if !self.backend.supports_edit() {
            return Err(CatalogError::Unsupported("full replace"));
        }
        self.send_json_body(reqwest::Method::PUT, &self.item_url(&product.id), product)
    }

    fn delete(&self, id: &ProductId) -> Result<()> {
        if !self.backend.supports_delete() {
            return Err(CatalogError::Unsupported("delete"));
        }
        let url = self.item_url(id);
        self.send("DELETE", &url, self.client.delete(&url))?;
        Ok(())
    }
}
