//! 核心响应处理模块

use serde::Serialize;

/// 列表响应结构，`count` 始终等于 `data` 的长度
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        let count = data.len();
        Self { data, count }
    }
}
