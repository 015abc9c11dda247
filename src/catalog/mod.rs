//! Static in-memory product catalog.
//!
//! Three fixed products, linear-scan lookup. Route handlers are the only
//! consumers.

use serde::Serialize;

/// A catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: &'static str,
    pub price: u32,
    pub description: &'static str,
}

static PRODUCTS: &[Product] = &[
    Product {
        id: 1,
        name: "Laptop",
        price: 1500,
        description: "A high-performance laptop",
    },
    Product {
        id: 2,
        name: "Smartphone",
        price: 800,
        description: "A smartphone with a great camera",
    },
    Product {
        id: 3,
        name: "Headphones",
        price: 200,
        description: "Noise-canceling headphones",
    },
];

/// All catalog entries.
pub fn all() -> &'static [Product] {
    PRODUCTS
}

/// Look up a product by id.
pub fn find(id: u32) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_three_products() {
        assert_eq!(all().len(), 3);
    }

    #[test]
    fn find_known_product() {
        let product = find(1).unwrap();
        assert_eq!(product.name, "Laptop");
        assert_eq!(product.price, 1500);
    }

    #[test]
    fn find_unknown_product() {
        assert!(find(99).is_none());
    }
}
