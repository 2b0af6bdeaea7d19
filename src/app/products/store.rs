//! 产品内存存储

use parking_lot::RwLock;

use super::model::{NewProduct, Product, ProductId};

/// 存储内部状态，产品列表与 id 计数器由同一把锁保护
#[derive(Debug)]
struct Inner {
    products: Vec<Product>,
    next_id: ProductId,
}

/// 进程内唯一的产品存储
///
/// 读操作共享读锁，插入在写锁内完成 id 分配和追加。
#[derive(Debug)]
pub struct ProductStore {
    inner: RwLock<Inner>,
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductStore {
    /// 空存储，id 从 1 开始
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                products: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// 带有 5 个固定示例产品的存储
    pub fn seeded() -> Self {
        let store = Self::new();
        for product in seed_products() {
            store.insert(product);
        }
        store
    }

    /// 按插入顺序返回全部产品的快照及数量
    pub fn list(&self) -> (Vec<Product>, usize) {
        let inner = self.inner.read();
        (inner.products.clone(), inner.products.len())
    }

    pub fn get_by_id(&self, id: ProductId) -> Option<Product> {
        self.inner
            .read()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// 分配新 id、填充默认值并追加
    pub fn insert(&self, candidate: NewProduct) -> Product {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;

        let product = candidate.into_product(id);
        inner.products.push(product.clone());
        product
    }

    pub fn len(&self) -> usize {
        self.inner.read().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn seed_products() -> Vec<NewProduct> {
    let item = |name: &str, description: &str, price: f64, availability: bool| NewProduct {
        name: name.to_string(),
        description: Some(description.to_string()),
        price: Some(price),
        availability: Some(availability),
    };

    vec![
        item(
            "Laptop Pro",
            "High-performance laptop with 16GB RAM and 512GB SSD",
            1299.99,
            true,
        ),
        item(
            "Wireless Mouse",
            "Ergonomic wireless mouse with precision tracking",
            29.99,
            true,
        ),
        item(
            "Mechanical Keyboard",
            "RGB mechanical keyboard with cherry MX switches",
            149.99,
            true,
        ),
        item(
            "USB-C Hub",
            "7-in-1 USB-C hub with HDMI, USB 3.0, and SD card reader",
            49.99,
            false,
        ),
        item(
            "Laptop Stand",
            "Adjustable aluminum laptop stand for better ergonomics",
            39.99,
            true,
        ),
    ]
}
