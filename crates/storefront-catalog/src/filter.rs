//! Client-side search over the fetched catalog.
//!
//! A product matches when its title, category, or brand contains the search
//! term, compared case-insensitively after trimming the term. An empty term
//! matches everything. [`FilterMemo`] keeps the last result so re-renders
//! with unchanged inputs do no string work at all.

use crate::product::{Product, ProductCollection};
use std::sync::Arc;

/// Trim and lowercase a raw search term.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Whether `product` matches an already-normalized term.
pub fn matches(product: &Product, normalized: &str) -> bool {
    if normalized.is_empty() {
        return true;
    }
    product.title.to_lowercase().contains(normalized)
        || product.category.to_lowercase().contains(normalized)
        || product
            .brand
            .as_deref()
            .is_some_and(|brand| brand.to_lowercase().contains(normalized))
}

/// A filtered, order-preserving window onto a [`ProductCollection`].
///
/// Holds the collection it was derived from, so a view can never be
/// combined with a different fetch's data.
#[derive(Debug, Clone)]
pub struct FilteredView {
    source: Arc<ProductCollection>,
    indices: Arc<[usize]>,
}

impl FilteredView {
    /// Number of matching products.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Matching products in their original order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> + '_ {
        self.indices.iter().map(|&i| &self.source[i])
    }

    pub fn get(&self, position: usize) -> Option<&Product> {
        self.indices.get(position).map(|&i| &self.source[i])
    }

    /// The collection this view was computed from.
    pub fn source(&self) -> &Arc<ProductCollection> {
        &self.source
    }

    /// Positions of the matches within [`source`](FilteredView::source).
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Copy the matches out as a standalone collection.
    pub fn to_collection(&self) -> ProductCollection {
        self.iter().cloned().collect()
    }
}

/// Filter `products` by `term`.
///
/// Pure and deterministic. The result is always a sub-sequence of
/// `products`; with a blank term it is all of them.
pub fn filter(products: &Arc<ProductCollection>, term: &str) -> FilteredView {
    let normalized = normalize_term(term);
    let indices: Vec<usize> = if normalized.is_empty() {
        (0..products.len()).collect()
    } else {
        products
            .iter()
            .enumerate()
            .filter(|(_, product)| matches(product, &normalized))
            .map(|(i, _)| i)
            .collect()
    };
    FilteredView {
        source: Arc::clone(products),
        indices: indices.into(),
    }
}

/// Remembers the last `(collection, term) -> view` computation.
///
/// The collection is compared by `Arc` identity (a refetch always produces a
/// new `Arc`), the term by its normalized form.
#[derive(Debug, Default)]
pub struct FilterMemo {
    last: Option<(String, FilteredView)>,
    computations: u64,
}

impl FilterMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the view for these inputs, recomputing only if they changed.
    pub fn get(&mut self, products: &Arc<ProductCollection>, term: &str) -> FilteredView {
        let normalized = normalize_term(term);
        if let Some((last_term, view)) = &self.last {
            if *last_term == normalized && Arc::ptr_eq(view.source(), products) {
                return view.clone();
            }
        }

        let view = filter(products, &normalized);
        self.computations += 1;
        tracing::debug!(
            term = %normalized,
            matched = view.len(),
            total = products.len(),
            "recomputed filtered view"
        );
        self.last = Some((normalized, view.clone()));
        view
    }

    /// How many times the filter actually ran.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Forget the cached result.
    pub fn clear(&mut self) {
        self.last = None;
    }
}
