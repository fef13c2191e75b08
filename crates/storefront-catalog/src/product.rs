use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Unique product identifier as assigned by the API.
pub type ProductId = u64;

/// A single catalog entry. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    /// Some catalog entries (groceries, mostly) have no brand.
    #[serde(default)]
    pub brand: Option<String>,
    pub thumbnail: String,
}

impl Product {
    /// Price with exactly two decimals, prefixed with `$`.
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

/// The ordered products returned by one fetch. Replaced wholesale on
/// refetch; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCollection(Vec<Product>);

impl ProductCollection {
    pub fn new(products: Vec<Product>) -> Self {
        Self(products)
    }

    pub fn into_vec(self) -> Vec<Product> {
        self.0
    }
}

impl Deref for ProductCollection {
    type Target = [Product];

    fn deref(&self) -> &[Product] {
        &self.0
    }
}

impl From<Vec<Product>> for ProductCollection {
    fn from(products: Vec<Product>) -> Self {
        Self(products)
    }
}

impl FromIterator<Product> for ProductCollection {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The listing envelope: one page of products plus pagination metadata.
///
/// Only `products` drives the UI; the rest is logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: ProductCollection,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_always_has_two_decimals() {
        let mut product = Product {
            id: 1,
            title: "iPhone 9".into(),
            description: "An apple mobile".into(),
            price: 549.0,
            category: "smartphones".into(),
            brand: Some("Apple".into()),
            thumbnail: "https://example.test/1.png".into(),
        };
        assert_eq!(product.display_price(), "$549.00");

        product.price = 9.99;
        assert_eq!(product.display_price(), "$9.99");

        product.price = 12.5;
        assert_eq!(product.display_price(), "$12.50");
    }

    #[test]
    fn page_parses_with_missing_brand() {
        let body = r#"{
            "products": [
                {"id": 16, "title": "Apple", "description": "Fresh", "price": 1.99,
                 "category": "groceries", "thumbnail": "https://example.test/16.png"}
            ],
            "total": 194, "skip": 0, "limit": 1
        }"#;
        let page: ProductPage = serde_json::from_str(body).expect("valid page");
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].brand, None);
        assert_eq!(page.total, 194);
    }

    #[test]
    fn page_rejects_missing_products() {
        let body = r#"{"total": 0, "skip": 0, "limit": 0}"#;
        assert!(serde_json::from_str::<ProductPage>(body).is_err());
    }
}
