//! The catalog client: owns the product list and drives every user action.
//!
//! Each mutation runs in three steps: *plan* computes the request from the
//! current state, *send* performs the network call, *finish* reconciles the
//! response. [`CatalogClient`] runs them back to back; the async wrapper
//! runs the send step without holding the client, so mutations can race.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::api::{CatalogApi, HttpApi};
use crate::config::{self, Backend, ClientConfig, NOTIFICATION_TTL};
use crate::error::{CatalogError, Result};
use crate::filter::ActiveFilter;
use crate::form::{self, ProductForm};
use crate::interaction::Interaction;
use crate::models::{NewProduct, Product, ProductEdit, ProductId, StockPatch};
use crate::notify::{Notification, NotificationKind, Notifier};
use crate::prefs::{PreferenceStore, Theme};
use crate::render::{self, RenderOptions, LOAD_ERROR_PLACEHOLDER};
use crate::state::{CatalogState, ReconcilePolicy, Ticket};

/// Source of the `YYYY-MM-DD` date stamped on mutations.
pub type Clock = fn() -> String;

// ---------------------------------------------------------------------------
// CatalogClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CatalogClient`].
///
/// Use [`CatalogClient::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CatalogClientBuilder::build) to create the
/// client.
pub struct CatalogClientBuilder {
    config: ClientConfig,
    timeout: Option<Duration>,
    reconcile: ReconcilePolicy,
    notification_ttl: Duration,
    clock: Clock,
}

impl Default for CatalogClientBuilder {
    fn default() -> Self {
        Self {
            config: ClientConfig::default(),
            timeout: None,
            reconcile: ReconcilePolicy::default(),
            notification_ttl: NOTIFICATION_TTL,
            clock: config::today,
        }
    }
}

impl CatalogClientBuilder {
    /// Start from settings read elsewhere, e.g. [`ClientConfig::from_env`].
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the collection endpoint URL.
    ///
    /// Only required for the document-store and hosted backends; the local
    /// backend defaults to `http://localhost:3000/products`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Credential sent with every request, for backends that take one.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Directory holding persisted preferences.
    ///
    /// If not set, the platform config directory is used (e.g.
    /// `~/.config/catalog-client` on Linux).
    pub fn state_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.state_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set an HTTP request timeout. By default requests never time out.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn reconcile(mut self, policy: ReconcilePolicy) -> Self {
        self.reconcile = policy;
        self
    }

    pub fn notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    /// Override the date source. Defaults to the local calendar date.
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Build a client talking HTTP to the configured endpoint.
    ///
    /// Does not contact the server; call [`CatalogClient::load`] for that.
    pub fn build(self) -> Result<CatalogClient<HttpApi>> {
        let url = self.config.collection_url()?;
        let api = HttpApi::new(
            self.config.backend,
            url,
            self.config.api_key.as_deref(),
            self.timeout,
        )?;
        self.build_with_api(api)
    }

    /// Build a client over any [`CatalogApi`] implementation.
    pub fn build_with_api<A: CatalogApi>(self, api: A) -> Result<CatalogClient<A>> {
        let prefs = PreferenceStore::open(self.config.state_dir.clone())?;
        let theme = prefs.theme().unwrap_or_default();
        debug!(%theme, prefs = %prefs.path().display(), "restored theme");

        Ok(CatalogClient {
            api,
            backend: self.config.backend,
            state: CatalogState::new(self.reconcile),
            filter: ActiveFilter::None,
            form: ProductForm::default(),
            prefs,
            theme,
            notifier: Notifier::new(self.notification_ttl),
            content: String::new(),
            clock: self.clock,
        })
    }
}

// ---------------------------------------------------------------------------
// Planned mutations
// ---------------------------------------------------------------------------

/// A stock change ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct StockChange {
    pub ticket: Ticket,
    pub patch: StockPatch,
}

/// A full replace ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    pub ticket: Ticket,
    pub product: Product,
}

/// What became of a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOutcome {
    /// The new stock would be negative; nothing was sent.
    Skipped,
    /// The server accepted the change and the local record was replaced.
    Applied,
    /// The server accepted the change but its response was not applied
    /// (stale under sequenced reconciliation, or the record was removed).
    Discarded,
}

/// What became of a full replace.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The server's product replaced the local record.
    Applied(Product),
    /// The server accepted the replace but its response was not applied
    /// (stale under sequenced reconciliation, or the record was removed).
    Discarded,
}

impl EditOutcome {
    /// The applied product, if any.
    pub fn applied(self) -> Option<Product> {
        match self {
            EditOutcome::Applied(product) => Some(product),
            EditOutcome::Discarded => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogClient
// ---------------------------------------------------------------------------

/// Client-side catalog: product list, filters, form, theme and notifications.
///
/// Created via [`CatalogClient::builder()`].
pub struct CatalogClient<A = HttpApi> {
    api: A,
    backend: Backend,
    state: CatalogState,
    filter: ActiveFilter,
    form: ProductForm,
    prefs: PreferenceStore,
    theme: Theme,
    notifier: Notifier,
    content: String,
    clock: Clock,
}

impl CatalogClient<HttpApi> {
    /// Create a new builder for configuring the client.
    pub fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::default()
    }
}

impl<A: CatalogApi> CatalogClient<A> {
    // -- Accessors ---------------------------------------------------------

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn products(&self) -> &[Product] {
        self.state.products()
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    /// The most recently rendered markup.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn active_filter(&self) -> &ActiveFilter {
        &self.filter
    }

    /// Products currently shown, according to the active filter.
    pub fn visible(&self) -> Vec<&Product> {
        self.filter.apply(self.state.products())
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    /// The theme currently applied to the page.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.prefs
    }

    /// The notification on screen at `now`, if it has not been dismissed yet.
    pub fn notification(&mut self, now: Instant) -> Option<&Notification> {
        self.notifier.visible(now)
    }

    fn today(&self) -> String {
        (self.clock)()
    }

    // -- Load and render ---------------------------------------------------

    /// Fetch the full collection and replace local state with it.
    ///
    /// On failure the list is left empty and the error placeholder is
    /// rendered. There is no retry.
    pub fn load(&mut self) -> Result<()> {
        let result = self.api.list();
        self.finish_load(result)
    }

    /// Apply the outcome of a "list all" request.
    pub fn finish_load(&mut self, result: Result<Vec<Product>>) -> Result<()> {
        match result {
            Ok(products) => {
                info!(count = products.len(), "loaded products");
                self.state.replace_all(products);
                self.refresh();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to load products");
                self.state.reset();
                self.content = LOAD_ERROR_PLACEHOLDER.to_string();
                Err(e)
            }
        }
    }

    /// Re-render the current view into [`content()`](Self::content).
    pub fn refresh(&mut self) -> &str {
        let visible = self.filter.apply(self.state.products());
        self.content = render::render(visible, RenderOptions::from(self.backend));
        &self.content
    }

    /// Show products whose name or description contains `term`.
    ///
    /// Replaces any category filter.
    pub fn search(&mut self, term: &str) -> &str {
        self.filter = ActiveFilter::Search(term.to_lowercase());
        self.refresh()
    }

    /// Show products in `category`; an empty category shows everything.
    ///
    /// Replaces any search filter.
    pub fn filter_category(&mut self, category: &str) -> &str {
        self.filter = if category.is_empty() {
            ActiveFilter::None
        } else {
            ActiveFilter::Category(category.to_string())
        };
        self.refresh()
    }

    /// Full page markup: theme attribute, notification and product list.
    pub fn page_markup(&mut self, now: Instant) -> String {
        let notification = self
            .notifier
            .visible(now)
            .map(Notification::to_markup)
            .unwrap_or_default();
        format!(
            "<body data-theme=\"{}\">\n{}<section id=\"content-section\">\n{}</section>\n</body>\n",
            self.theme, notification, self.content
        )
    }

    // -- Stock -------------------------------------------------------------

    pub fn increase_stock(&mut self, id: &ProductId) -> Result<StockOutcome> {
        self.change_stock(id, 1)
    }

    pub fn decrease_stock(&mut self, id: &ProductId) -> Result<StockOutcome> {
        self.change_stock(id, -1)
    }

    fn change_stock(&mut self, id: &ProductId, delta: i64) -> Result<StockOutcome> {
        let Some(change) = self.plan_stock_change(id, delta)? else {
            return Ok(StockOutcome::Skipped);
        };
        let result = self.api.patch_stock(&change.ticket.id, &change.patch);
        self.finish_stock_change(change, result)
    }

    /// Compute the partial update for moving `id`'s stock by `delta`.
    ///
    /// Returns `None` when the new stock would be negative.
    pub fn plan_stock_change(&mut self, id: &ProductId, delta: i64) -> Result<Option<StockChange>> {
        let product = self
            .state
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        let candidate = i64::from(product.stock) + delta;
        let Ok(stock) = u32::try_from(candidate) else {
            debug!(%id, candidate, "refusing out-of-range stock");
            return Ok(None);
        };

        let patch = StockPatch {
            id: None,
            stock,
            last_updated: self.today(),
        };
        Ok(Some(StockChange {
            ticket: self.state.issue(id),
            patch,
        }))
    }

    /// Reconcile the server's answer to a planned stock change.
    pub fn finish_stock_change(
        &mut self,
        change: StockChange,
        result: Result<Product>,
    ) -> Result<StockOutcome> {
        match result {
            Ok(updated) => {
                if self.state.apply(&change.ticket, updated) {
                    self.refresh();
                    Ok(StockOutcome::Applied)
                } else {
                    Ok(StockOutcome::Discarded)
                }
            }
            Err(e) => {
                error!(id = %change.ticket.id, error = %e, "failed to update stock");
                Err(e)
            }
        }
    }

    // -- Create ------------------------------------------------------------

    /// Submit the form as a new product.
    ///
    /// On success the server's product is appended and the form is cleared.
    /// On failure the form keeps its values so the user can resubmit.
    pub fn create(&mut self) -> Result<Product> {
        let new_product = self.plan_create()?;
        let result = self.api.create(&new_product);
        self.finish_create(result)
    }

    /// Validate the form and build the create body.
    pub fn plan_create(&self) -> Result<NewProduct> {
        self.form.to_new_product(&self.today()).inspect_err(|e| {
            error!(error = %e, "invalid product form");
        })
    }

    pub fn finish_create(&mut self, result: Result<Product>) -> Result<Product> {
        match result {
            Ok(created) => {
                info!(id = %created.id, name = %created.name, "created product");
                self.state.push(created.clone());
                self.refresh();
                self.form.clear();
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, "failed to create product");
                Err(e)
            }
        }
    }

    // -- Edit --------------------------------------------------------------

    /// Prompt for new name, description, price and category, then replace
    /// the product on the server.
    ///
    /// Dismissing or emptying any prompt aborts without a request.
    pub fn edit(&mut self, id: &ProductId, ui: &mut dyn Interaction) -> Result<EditOutcome> {
        if !self.backend.supports_edit() {
            return Err(CatalogError::Unsupported("edit"));
        }
        let replacement = self.plan_edit(id, ui)?;
        let result = self.api.replace(&replacement.product);
        self.finish_edit(replacement, result)
    }

    pub fn plan_edit(&mut self, id: &ProductId, ui: &mut dyn Interaction) -> Result<Replacement> {
        let current = self
            .state
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?
            .clone();

        let edit = match prompt_edit(&current, ui) {
            Some(edit) => edit,
            None => {
                debug!(%id, "edit cancelled");
                return Err(CatalogError::Cancelled);
            }
        };

        Ok(Replacement {
            product: current.merged_with(&edit, &self.today()),
            ticket: self.state.issue(id),
        })
    }

    /// Reconcile the server's answer to a planned replace.
    ///
    /// The success notification is only raised when the response reached
    /// the local list.
    pub fn finish_edit(
        &mut self,
        replacement: Replacement,
        result: Result<Product>,
    ) -> Result<EditOutcome> {
        match result {
            Ok(updated) => {
                if !self.state.apply(&replacement.ticket, updated.clone()) {
                    return Ok(EditOutcome::Discarded);
                }
                self.refresh();
                self.notify(NotificationKind::Success, "Product updated");
                Ok(EditOutcome::Applied(updated))
            }
            Err(e) => {
                error!(id = %replacement.ticket.id, error = %e, "failed to update product");
                self.notify(NotificationKind::Error, "Failed to update product");
                Err(e)
            }
        }
    }

    // -- Delete ------------------------------------------------------------

    /// Ask for confirmation, then delete the product.
    ///
    /// Returns `Ok(false)` when the user declines; nothing is sent.
    pub fn delete(&mut self, id: &ProductId, ui: &mut dyn Interaction) -> Result<bool> {
        if !self.backend.supports_delete() {
            return Err(CatalogError::Unsupported("delete"));
        }
        let name = self
            .state
            .get(id)
            .map(|p| p.name.clone())
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        if !ui.confirm(&format!("Delete \"{name}\"?")) {
            debug!(%id, "delete declined");
            return Ok(false);
        }

        let result = self.api.delete(id);
        self.finish_delete(id, result)?;
        Ok(true)
    }

    pub fn finish_delete(&mut self, id: &ProductId, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                self.state.remove(id);
                self.refresh();
                self.notify(NotificationKind::Success, "Product deleted");
                Ok(())
            }
            Err(e) => {
                error!(%id, error = %e, "failed to delete product");
                self.notify(NotificationKind::Error, "Failed to delete product");
                Err(e)
            }
        }
    }

    // -- Theme -------------------------------------------------------------

    /// Flip between light and dark, persisting the choice immediately.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        self.prefs.set_theme(next)?;
        self.theme = next;
        Ok(next)
    }

    fn notify(&mut self, kind: NotificationKind, message: &str) {
        if self.backend.notifies() {
            self.notifier.show(kind, message, Instant::now());
        }
    }
}

fn prompt_edit(current: &Product, ui: &mut dyn Interaction) -> Option<ProductEdit> {
    let mut ask = |message: &str, default: &str| {
        ui.prompt(message, default)
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty())
    };

    let name = ask("New name", &current.name)?;
    let description = ask("New description", &current.description)?;
    let price = form::parse_price(&ask("New price", &current.price.to_string())?).ok()?;
    let category = ask("New category", &current.category)?;

    Some(ProductEdit {
        name,
        description,
        price,
        category,
    })
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl<A> fmt::Display for CatalogClient<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CatalogClient(backend={}, products={}, loaded={}, theme={}, prefs={})",
            self.backend,
            self.state.products().len(),
            self.state.is_loaded(),
            self.theme,
            self.prefs.path().display()
        )
    }
}

