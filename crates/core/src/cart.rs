//! Session cart and category grouping.
//!
//! A cart line holds a copy of the product taken when the line was first
//! created. Catalog edits made afterwards (price, discount, names) do not
//! reach lines already in a cart; adding the same product again only bumps
//! the quantity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId, effective_price};

/// One product snapshot plus a quantity of at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    product: Product,
    quantity: u32,
}

impl CartLine {
    /// The product as it was when the line was created.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Discounted per-unit price.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        effective_price(&self.product)
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }
}

/// A customer's in-progress selection, at most one line per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for `product.id`, or appends a new line
    /// with quantity 1 holding a snapshot of `product`.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            });
        }
    }

    /// Remove one unit of the product.
    ///
    /// A line at quantity 1 is dropped rather than kept at 0. Unknown ids
    /// are ignored.
    pub fn remove(&mut self, product_id: &ProductId) {
        if let Some(line) = self.line_mut(product_id) {
            if line.quantity > 1 {
                line.quantity -= 1;
                return;
            }
        }
        self.lines.retain(|l| &l.product.id != product_id);
    }

    /// Quantity of the product in the cart, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.lines
            .iter()
            .find(|l| &l.product.id == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Sum of every line's discounted total.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |acc, l| acc.saturating_add(l.quantity))
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.product.id == product_id)
    }
}

/// Products sharing a category, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub products: Vec<&'a Product>,
}

/// Group products by category.
///
/// Groups appear in order of each category's first occurrence; products
/// keep their relative catalog order within a group.
#[must_use]
pub fn group_by_category(products: &[Product]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    for product in products {
        match groups
            .iter_mut()
            .find(|g| g.category == product.category.as_str())
        {
            Some(group) => group.products.push(product),
            None => groups.push(CategoryGroup {
                category: &product.category,
                products: vec![product],
            }),
        }
    }
    groups
}
