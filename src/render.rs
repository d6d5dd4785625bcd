//! Typed view model and markup rendering for product cards.
//!
//! Rendering is a pure function of its input: the same products and options
//! always produce the same markup, and an empty input produces an empty
//! string.

use crate::config::{Backend, CURRENCY_SUFFIX};
use crate::models::{Product, ProductId};

/// Placeholder shown in place of the list when the initial load fails.
pub const LOAD_ERROR_PLACEHOLDER: &str = "<p>Error loading data</p>";

// ---------------------------------------------------------------------------
// RenderOptions
// ---------------------------------------------------------------------------

/// Which optional per-card controls to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub edit: bool,
    pub delete: bool,
}

impl From<Backend> for RenderOptions {
    fn from(backend: Backend) -> Self {
        Self {
            edit: backend.supports_edit(),
            delete: backend.supports_delete(),
        }
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    DecreaseStock { id: ProductId, disabled: bool },
    IncreaseStock { id: ProductId },
    Edit { id: ProductId },
    Delete { id: ProductId },
}

impl CardAction {
    fn name(&self) -> &'static str {
        match self {
            CardAction::DecreaseStock { .. } => "decrease",
            CardAction::IncreaseStock { .. } => "increase",
            CardAction::Edit { .. } => "edit",
            CardAction::Delete { .. } => "delete",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CardAction::DecreaseStock { .. } => "Decrease stock",
            CardAction::IncreaseStock { .. } => "Increase stock",
            CardAction::Edit { .. } => "Edit",
            CardAction::Delete { .. } => "Delete",
        }
    }

    fn id(&self) -> &ProductId {
        match self {
            CardAction::DecreaseStock { id, .. }
            | CardAction::IncreaseStock { id }
            | CardAction::Edit { id }
            | CardAction::Delete { id } => id,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, CardAction::DecreaseStock { disabled: true, .. })
    }
}

/// Display-ready projection of a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub category: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub price: String,
    pub stock: u32,
    pub rating: String,
    pub last_updated: String,
    pub actions: Vec<CardAction>,
}

impl ProductCard {
    pub fn new(product: &Product, options: RenderOptions) -> Self {
        let mut actions = vec![
            CardAction::DecreaseStock {
                id: product.id.clone(),
                disabled: product.stock == 0,
            },
            CardAction::IncreaseStock {
                id: product.id.clone(),
            },
        ];
        if options.edit {
            actions.push(CardAction::Edit {
                id: product.id.clone(),
            });
        }
        if options.delete {
            actions.push(CardAction::Delete {
                id: product.id.clone(),
            });
        }

        Self {
            id: product.id.clone(),
            category: product.category.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            image: Some(product.image.clone()).filter(|url| !url.is_empty()),
            price: format_price(product.price),
            stock: product.stock,
            rating: format!("⭐ {}", product.rating),
            last_updated: product.last_updated.clone(),
            actions,
        }
    }

    /// Markup for this card.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "<div class=\"card\" data-id=\"{}\">\n",
            escape(self.id.as_str())
        ));
        out.push_str(&format!(
            "  <span class=\"category\">{}</span>\n",
            escape(&self.category)
        ));
        if let Some(url) = &self.image {
            out.push_str(&format!(
                "  <img src=\"{}\" alt=\"{}\">\n",
                escape(url),
                escape(&self.name)
            ));
        }
        out.push_str(&format!("  <h3>{}</h3>\n", escape(&self.name)));
        out.push_str(&format!("  <p>{}</p>\n", escape(&self.description)));
        out.push_str("  <div class=\"product-details\">\n");
        out.push_str(&format!(
            "    <span class=\"price\">{}</span>\n",
            escape(&self.price)
        ));
        out.push_str(&format!(
            "    <span class=\"stock\">Stock: {}</span>\n",
            self.stock
        ));
        out.push_str(&format!(
            "    <span class=\"rating\">{}</span>\n",
            escape(&self.rating)
        ));
        out.push_str("  </div>\n");
        out.push_str(&format!(
            "  <span class=\"date\">Last updated: {}</span>\n",
            escape(&self.last_updated)
        ));
        out.push_str("  <div class=\"actions\">\n");
        for action in &self.actions {
            out.push_str(&format!(
                "    <button data-action=\"{}\" data-id=\"{}\"{}>{}</button>\n",
                action.name(),
                escape(action.id().as_str()),
                if action.is_disabled() { " disabled" } else { "" },
                action.label()
            ));
        }
        out.push_str("  </div>\n");
        out.push_str("</div>\n");
        out
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a sequence of products to markup.
pub fn render<'a, I>(products: I, options: RenderOptions) -> String
where
    I: IntoIterator<Item = &'a Product>,
{
    products
        .into_iter()
        .map(|p| ProductCard::new(p, options).to_markup())
        .collect()
}

/// `12.5` -> `"12.50 €"`.
pub fn format_price(price: f64) -> String {
    format!("{} {CURRENCY_SUFFIX}", fixed_two(price))
}

/// Every finite `f64` has a terminating decimal expansion of at most this
/// many fractional digits.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Two fractional digits, ties rounded away from zero.
///
/// Rounds the exact decimal value of `value`, so `0.125` becomes `0.13`
/// while `1.005` (stored as `1.00499...`) becomes `1.00`.
fn fixed_two(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let fraction = fraction.as_bytes();

    let mut digits: Vec<u8> = whole.bytes().collect();
    digits.extend((0..2).map(|i| fraction.get(i).copied().unwrap_or(b'0')));

    if fraction.get(2).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - 2;
    let sign = if value < 0.0 { "-" } else { "" };
    format!(
        "{sign}{}.{}",
        String::from_utf8_lossy(&digits[..split]),
        String::from_utf8_lossy(&digits[split..])
    )
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
