//! Shared test fixtures for the catalog client integration tests.
//!
//! Provides `FakeApi`, an in-memory stand-in for the remote product API that
//! records every call and can be told to fail, plus sample products and a
//! scripted `Interaction`.

#![allow(dead_code)]

use catalog_client::{
    Backend, CatalogApi, CatalogClient, CatalogError, Interaction, NewProduct, Product,
    ProductId, Result, StockPatch,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TODAY: &str = "2026-10-19";

pub fn fixed_today() -> String {
    TODAY.to_string()
}

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

pub fn product(id: i64, name: &str, description: &str, category: &str, stock: u32) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        price: 10.0,
        stock,
        image: String::new(),
        rating: 4.5,
        last_updated: "2026-01-01".to_string(),
    }
}

pub fn sample_products() -> Vec<Product> {
    vec![
        product(1, "Claw Hammer", "Steel head, fibreglass handle", "tools", 12),
        product(2, "Garden Hose", "Fifteen metres, kink resistant", "garden", 0),
        product(3, "Screwdriver Set", "Six pieces with magnetic tips", "tools", 4),
        product(7, "Desk Lamp", "LED lamp with a HAMMERED brass finish", "home", 3),
        product(9, "Watering Can", "Galvanised, ten litres", "garden", 8),
    ]
}

// ---------------------------------------------------------------------------
// FakeApi
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(NewProduct),
    PatchStock(ProductId, StockPatch),
    Replace(Product),
    Delete(ProductId),
}

#[derive(Default)]
struct FakeServer {
    products: Vec<Product>,
    calls: Vec<Call>,
    failing: bool,
    next_id: i64,
    stock_delays: HashMap<u32, Duration>,
}

/// In-memory product API. Clones share the same server.
#[derive(Clone, Default)]
pub struct FakeApi {
    server: Arc<Mutex<FakeServer>>,
}

impl FakeApi {
    pub fn with_products(products: Vec<Product>) -> Self {
        let next_id = 100;
        Self {
            server: Arc::new(Mutex::new(FakeServer {
                products,
                next_id,
                ..FakeServer::default()
            })),
        }
    }

    /// Make every following call fail with a 500.
    pub fn set_failing(&self, failing: bool) {
        self.server.lock().unwrap().failing = failing;
    }

    /// Delay the response to any stock patch setting `stock`.
    pub fn delay_stock_response(&self, stock: u32, delay: Duration) {
        self.server.lock().unwrap().stock_delays.insert(stock, delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.server.lock().unwrap().calls.clone()
    }

    /// Calls other than the initial list.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::List)
            .collect()
    }

    pub fn server_products(&self) -> Vec<Product> {
        self.server.lock().unwrap().products.clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut server = self.server.lock().unwrap();
        server.calls.push(call);
        if server.failing {
            return Err(CatalogError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                url: "fake://products".to_string(),
            });
        }
        Ok(())
    }
}

impl CatalogApi for FakeApi {
    fn list(&self) -> Result<Vec<Product>> {
        self.record(Call::List)?;
        Ok(self.server_products())
    }

    fn create(&self, product: &NewProduct) -> Result<Product> {
        self.record(Call::Create(product.clone()))?;
        let mut server = self.server.lock().unwrap();
        server.next_id += 1;
        let created = Product {
            id: ProductId::from(server.next_id),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price,
            stock: product.stock,
            image: product.image.clone(),
            rating: product.rating,
            last_updated: product.last_updated.clone(),
        };
        server.products.push(created.clone());
        Ok(created)
    }

    fn patch_stock(&self, id: &ProductId, patch: &StockPatch) -> Result<Product> {
        self.record(Call::PatchStock(id.clone(), patch.clone()))?;
        let delay = self
            .server
            .lock()
            .unwrap()
            .stock_delays
            .get(&patch.stock)
            .copied();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        let mut server = self.server.lock().unwrap();
        let product = server
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        product.stock = patch.stock;
        product.last_updated = patch.last_updated.clone();
        Ok(product.clone())
    }

    fn replace(&self, product: &Product) -> Result<Product> {
        self.record(Call::Replace(product.clone()))?;
        let mut server = self.server.lock().unwrap();
        let existing = server
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| CatalogError::NotFound(product.id.clone()))?;
        *existing = product.clone();
        Ok(product.clone())
    }

    fn delete(&self, id: &ProductId) -> Result<()> {
        self.record(Call::Delete(id.clone()))?;
        self.server.lock().unwrap().products.retain(|p| &p.id != id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Client setup
// ---------------------------------------------------------------------------

/// A loaded client over a `FakeApi` seeded with `products`.
///
/// Returns `(client, api, tempdir)`. Keep the `TempDir` alive for the test's
/// duration; it holds the preferences file.
pub fn loaded_client(
    backend: Backend,
    products: Vec<Product>,
) -> (CatalogClient<FakeApi>, FakeApi, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let api = FakeApi::with_products(products);
    let mut client = CatalogClient::builder()
        .backend(backend)
        .state_dir(tmp_dir.path())
        .clock(fixed_today)
        .build_with_api(api.clone())
        .unwrap();
    client.load().unwrap();
    (client, api, tmp_dir)
}

// ---------------------------------------------------------------------------
// ScriptedInteraction
// ---------------------------------------------------------------------------

/// Answers prompts from a queue; `None` entries dismiss the prompt.
#[derive(Default)]
pub struct ScriptedInteraction {
    pub answers: VecDeque<Option<String>>,
    pub confirm_answer: bool,
    pub prompts_seen: Vec<String>,
    pub confirms_seen: Vec<String>,
}

impl ScriptedInteraction {
    pub fn answering(answers: &[Option<&str>]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
            ..Self::default()
        }
    }

    pub fn confirming(answer: bool) -> Self {
        Self {
            confirm_answer: answer,
            ..Self::default()
        }
    }
}

impl Interaction for ScriptedInteraction {
    fn prompt(&mut self, message: &str, _default: &str) -> Option<String> {
        self.prompts_seen.push(message.to_string());
        self.answers.pop_front().flatten()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms_seen.push(message.to_string());
        self.confirm_answer
    }
}
