//! In-memory product list and response reconciliation.

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::models::{Product, ProductId};

/// How responses to racing mutations on the same record are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Apply every successful response as it arrives. When two mutations on
    /// one record race, whichever response lands last wins, even if it
    /// answers the older request.
    #[default]
    LastResponseWins,
    /// Stamp each mutation with a per-record sequence number and drop a
    /// response older than the one already applied.
    Sequenced,
}

/// Handle for one in-flight mutation on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: ProductId,
    pub seq: u64,
}

/// The client's view of the catalog.
///
/// Replaced wholesale after a load and patched item by item after each
/// mutation. Never authoritative on its own.
#[derive(Debug, Default)]
pub struct CatalogState {
    products: Vec<Product>,
    loaded: bool,
    policy: ReconcilePolicy,
    issued: HashMap<ProductId, u64>,
    applied: HashMap<ProductId, u64>,
}

impl CatalogState {
    pub fn new(policy: ReconcilePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Replace the whole list with a freshly loaded collection.
    ///
    /// Duplicate ids keep their first occurrence.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        let mut seen = HashSet::new();
        let before = products.len();
        self.products = products
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        if self.products.len() != before {
            warn!(
                dropped = before - self.products.len(),
                "server returned duplicate product ids"
            );
        }
        self.issued.clear();
        self.applied.clear();
        self.loaded = true;
    }

    /// Forget everything, as after a failed load.
    pub fn reset(&mut self) {
        self.products.clear();
        self.issued.clear();
        self.applied.clear();
        self.loaded = false;
    }

    /// Register a new mutation on `id` and return its ticket.
    pub fn issue(&mut self, id: &ProductId) -> Ticket {
        let seq = self.issued.entry(id.clone()).or_insert(0);
        *seq += 1;
        Ticket {
            id: id.clone(),
            seq: *seq,
        }
    }

    /// Apply a server response for the mutation identified by `ticket`.
    ///
    /// Returns `true` if the local record was replaced. A response is not
    /// applied when the record is gone, or, under
    /// [`ReconcilePolicy::Sequenced`], when a newer response was already
    /// applied.
    pub fn apply(&mut self, ticket: &Ticket, product: Product) -> bool {
        if self.policy == ReconcilePolicy::Sequenced {
            let last = self.applied.get(&ticket.id).copied().unwrap_or(0);
            if ticket.seq < last {
                debug!(id = %ticket.id, seq = ticket.seq, last, "discarding stale response");
                return false;
            }
        }

        let Some(slot) = self.products.iter_mut().find(|p| p.id == ticket.id) else {
            debug!(id = %ticket.id, "response for a record no longer in the list");
            return false;
        };
        *slot = product;
        self.applied.insert(ticket.id.clone(), ticket.seq);
        true
    }

    /// Append a newly created product, or replace it if the id is already present.
    pub fn push(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                warn!(id = %product.id, "created product id already present; replacing");
                *existing = product;
            }
            None => self.products.push(product),
        }
    }

    /// Remove a product by id.
    pub fn remove(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|p| &p.id == id)?;
        self.issued.remove(id);
        self.applied.remove(id);
        Some(self.products.remove(index))
    }
}
