//! 产品业务服务

use std::sync::Arc;

use super::{
    model::{NewProduct, Product, ProductId},
    store::ProductStore,
};
use crate::core::{error::CoreError, response::ListResponse};

#[derive(Clone)]
pub struct ProductService {
    store: Arc<ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<ProductStore>) -> Self {
        Self { store }
    }

    pub fn list_products(&self) -> ListResponse<Product> {
        let (data, count) = self.store.list();
        debug_assert_eq!(count, data.len());
        ListResponse::new(data)
    }

    pub fn get_product(&self, id: ProductId) -> Result<Product, CoreError> {
        self.store
            .get_by_id(id)
            .ok_or_else(|| CoreError::NotFound(format!("Product with ID {} not found", id)))
    }

    /// 创建产品，`candidate` 必须已经通过校验
    pub fn create_product(&self, candidate: NewProduct) -> Product {
        self.store.insert(candidate)
    }

    pub fn product_count(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::products::validation::validate_create_payload;
    use serde_json::json;

    fn service() -> ProductService {
        ProductService::new(Arc::new(ProductStore::seeded()))
    }

    #[test]
    fn list_count_matches_data() {
        let result = service().list_products();

        assert!(!result.data.is_empty());
        assert_eq!(result.count, result.data.len());
        for product in &result.data {
            assert!(product.id > 0);
            assert!(!product.name.is_empty());
            assert!(!product.description.is_empty());
            assert!(product.price >= 0.01);
        }
    }

    #[test]
    fn list_is_stable_without_writes() {
        let service = service();
        assert_eq!(service.list_products(), service.list_products());
    }

    #[test]
    fn get_product_returns_matching_id() {
        let service = service();
        for id in 1..=5 {
            assert_eq!(service.get_product(id).unwrap().id, id);
        }
    }

    #[test]
    fn get_product_reports_missing_id() {
        match service().get_product(999) {
            Err(CoreError::NotFound(message)) => {
                assert_eq!(message, "Product with ID 999 not found")
            }
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn create_product_returns_generated_id() {
        let service = service();
        let product = service.create_product(NewProduct {
            name: "New Product".to_string(),
            description: Some("New description".to_string()),
            price: Some(12.34),
            availability: Some(false),
        });

        assert_eq!(product.name, "New Product");
        assert_eq!(product.description, "New description");
        assert_eq!(product.price, 12.34);
        assert!(!product.availability);
        assert_eq!(service.get_product(product.id).unwrap(), product);
    }

    #[test]
    fn create_product_applies_defaults() {
        let product = service().create_product(NewProduct::named("Minimal Product"));

        assert_eq!(product.description, "");
        assert_eq!(product.price, 0.01);
        assert!(product.availability);
    }

    #[test]
    fn created_ids_increase_monotonically() {
        let service = service();
        let mut last = service
            .list_products()
            .data
            .iter()
            .map(|p| p.id)
            .max()
            .unwrap();

        for i in 0..5 {
            let product = service.create_product(NewProduct::named(format!("Item {}", i)));
            assert!(product.id > last);
            last = product.id;
        }
        assert_eq!(service.product_count(), 10);
    }

    #[test]
    fn missing_name_never_reaches_the_store() {
        let service = service();
        let result = validate_create_payload(&json!({ "description": "Missing name" }));

        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(service.product_count(), 5);
    }
}
