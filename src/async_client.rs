//! Async wrapper around [`CatalogClient`] for use in async runtimes (Tokio, etc.).
//!
//! Network calls run on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free. The
//! client lock is held only while a mutation is planned and while its
//! response is applied, never across the call itself, so several mutations
//! can be in flight at once.
//!
//! # Example
//!
//! ```no_run
//! use catalog_client::{AsyncCatalogClient, CatalogClient, ProductId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = AsyncCatalogClient::connect(CatalogClient::builder())
//!         .await
//!         .unwrap();
//!     client.load().await.unwrap();
//!
//!     let id = ProductId::from(7);
//!     let (a, b) = tokio::join!(client.increase_stock(&id), client.increase_stock(&id));
//! }
//! ```

use std::sync::{Arc, Mutex};

use crate::api::{CatalogApi, HttpApi};
use crate::client::{CatalogClient, CatalogClientBuilder, StockOutcome};
use crate::error::{CatalogError, Result};
use crate::models::{Product, ProductId};

/// Async wrapper around [`CatalogClient`].
///
/// The client is protected by a [`Mutex`]; each network call works on a
/// clone of the API handle outside the lock.
pub struct AsyncCatalogClient<A> {
    inner: Arc<Mutex<CatalogClient<A>>>,
}

impl<A> Clone for AsyncCatalogClient<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AsyncCatalogClient<HttpApi> {
    /// Build an HTTP-backed client.
    ///
    /// Construction runs on the blocking thread pool so the blocking HTTP
    /// client is never created on the async event loop.
    pub async fn connect(builder: CatalogClientBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || builder.build().map(Self::new))
            .await
            .map_err(join_error)?
    }
}

impl<A> AsyncCatalogClient<A>
where
    A: CatalogApi + Clone + Send + 'static,
{
    pub fn new(client: CatalogClient<A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Run a sync client operation on the blocking thread pool.
    ///
    /// The closure receives exclusive access to the client for its whole
    /// duration, so it should not make network calls that other tasks
    /// could otherwise overlap with.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CatalogClient<A>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = client
                .lock()
                .map_err(|_| CatalogError::InvalidInput("client lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(join_error)?
    }

    /// Run a network call on the blocking pool without holding the client.
    async fn send<F, T>(api: A, f: F) -> Result<T>
    where
        F: FnOnce(&A) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(move || f(&api))
            .await
            .map_err(join_error)?
    }

    /// Fetch the full collection.
    pub async fn load(&self) -> Result<()> {
        let api = self.run(|c| Ok(c.api().clone())).await?;
        let result = Self::send(api, |api| api.list()).await;
        self.run(move |c| c.finish_load(result)).await
    }

    pub async fn increase_stock(&self, id: &ProductId) -> Result<StockOutcome> {
        self.change_stock(id, 1).await
    }

    pub async fn decrease_stock(&self, id: &ProductId) -> Result<StockOutcome> {
        self.change_stock(id, -1).await
    }

    async fn change_stock(&self, id: &ProductId, delta: i64) -> Result<StockOutcome> {
        let id = id.clone();
        let planned = self
            .run(move |c| Ok(c.plan_stock_change(&id, delta)?.map(|ch| (ch, c.api().clone()))))
            .await?;
        let Some((change, api)) = planned else {
            return Ok(StockOutcome::Skipped);
        };

        let (id, patch) = (change.ticket.id.clone(), change.patch.clone());
        let result = Self::send(api, move |api| api.patch_stock(&id, &patch)).await;
        self.run(move |c| c.finish_stock_change(change, result)).await
    }

    /// Submit the form as a new product.
    pub async fn create(&self) -> Result<Product> {
        let (new_product, api) = self
            .run(|c| Ok((c.plan_create()?, c.api().clone())))
            .await?;
        let result = Self::send(api, move |api| api.create(&new_product)).await;
        self.run(move |c| c.finish_create(result)).await
    }

    /// Snapshot of the current product list.
    pub async fn products(&self) -> Result<Vec<Product>> {
        self.run(|c| Ok(c.products().to_vec())).await
    }

    /// The most recently rendered markup.
    pub async fn content(&self) -> Result<String> {
        self.run(|c| Ok(c.content().to_string())).await
    }
}

fn join_error(e: tokio::task::JoinError) -> CatalogError {
    CatalogError::InvalidInput(format!("Task join error: {e}"))
}
