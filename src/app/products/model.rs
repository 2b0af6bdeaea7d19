//! 产品数据模型

use serde::{Deserialize, Serialize};

pub type ProductId = i64;

/// 未提供描述时的默认值
pub const DEFAULT_DESCRIPTION: &str = "";
/// 未提供价格时的默认值
pub const DEFAULT_PRICE: f64 = 0.01;
/// 未提供库存状态时的默认值
pub const DEFAULT_AVAILABILITY: bool = true;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub availability: bool,
}

/// 通过校验、尚未填充默认值的创建请求
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub availability: Option<bool>,
}

impl NewProduct {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 分配 id 并填充缺省字段
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            price: self.price.unwrap_or(DEFAULT_PRICE),
            availability: self.availability.unwrap_or(DEFAULT_AVAILABILITY),
        }
    }
}
