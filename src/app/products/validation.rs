//! 创建产品请求的校验
//!
//! 先对原始 JSON 做白名单与类型检查，再交给 `validator` 做长度和范围检查。
//! 所有违规信息会一并返回。

use serde_json::{Map, Value};
use std::{borrow::Cow, collections::HashMap};
use validator::{Validate, ValidationError, ValidationErrors};

use super::model::NewProduct;
use crate::core::error::CoreError;

/// 允许出现的字段，同时决定错误信息的顺序
pub const FIELDS: [&str; 4] = ["name", "description", "price", "availability"];

pub const NAME_MAX_LEN: usize = 200;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

#[derive(Debug, Default, Validate)]
struct CreateProductDto {
    /// 缺失或类型错误时为空串，由 `validate_name` 报告
    #[validate(custom(function = "validate_name"))]
    name: String,

    #[validate(length(min = 1, max = 1000, message = "description must be between 1 and 1000 characters"))]
    description: Option<String>,

    #[validate(range(min = 0.01, message = "price must not be less than 0.01"))]
    price: Option<f64>,

    availability: Option<bool>,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 {
        let mut err = ValidationError::new("length");
        err.message = Some(Cow::Borrowed("name should not be empty"));
        return Err(err);
    }
    if len > NAME_MAX_LEN {
        let mut err = ValidationError::new("length");
        err.message = Some(Cow::Borrowed(
            "name must be shorter than or equal to 200 characters",
        ));
        return Err(err);
    }
    Ok(())
}

/// 按字段收集的违规信息
#[derive(Default)]
struct Violations {
    unknown: Vec<String>,
    by_field: HashMap<&'static str, Vec<String>>,
}

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.by_field.entry(field).or_default().push(message.into());
    }

    fn absorb(&mut self, errors: &ValidationErrors) {
        let field_errors = errors.field_errors();
        for field in FIELDS {
            if let Some(errors) = field_errors.get(field) {
                for error in errors.iter() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    self.push(field, message);
                }
            }
        }
    }

    fn into_messages(mut self) -> Vec<String> {
        let mut messages = self.unknown;
        for field in FIELDS {
            if let Some(field_messages) = self.by_field.remove(field) {
                messages.extend(field_messages);
            }
        }
        messages
    }
}

/// 校验创建请求并转换为 [`NewProduct`]
///
/// 未知字段、类型错误、长度或范围越界都会导致 [`CoreError::Validation`]。
/// 可选字段为 `null` 时视为未提供。名称会去掉首尾空白。
pub fn validate_create_payload(payload: &Value) -> Result<NewProduct, CoreError> {
    let Some(object) = payload.as_object() else {
        return Err(CoreError::Validation(vec![
            "request body must be a JSON object".to_string(),
        ]));
    };

    let mut violations = Violations::default();
    for key in object.keys() {
        if !FIELDS.contains(&key.as_str()) {
            violations
                .unknown
                .push(format!("property {} should not exist", key));
        }
    }

    let dto = extract_fields(object, &mut violations);
    if let Err(errors) = dto.validate() {
        violations.absorb(&errors);
    }

    let messages = violations.into_messages();
    if !messages.is_empty() {
        return Err(CoreError::Validation(messages));
    }

    Ok(NewProduct {
        name: dto.name.trim().to_string(),
        description: dto.description,
        price: dto.price,
        availability: dto.availability,
    })
}

/// 类型检查，类型正确的字段放入 DTO 等待范围校验
fn extract_fields(object: &Map<String, Value>, violations: &mut Violations) -> CreateProductDto {
    let mut dto = CreateProductDto::default();

    match object.get("name") {
        Some(Value::String(name)) => dto.name = name.clone(),
        _ => violations.push("name", "name must be a string"),
    }

    match object.get("description") {
        None | Some(Value::Null) => {}
        Some(Value::String(description)) => dto.description = Some(description.clone()),
        Some(_) => violations.push("description", "description must be a string"),
    }

    match object.get("price") {
        None | Some(Value::Null) => {}
        Some(Value::Number(price)) => match price.as_f64() {
            Some(price) if price.is_finite() => dto.price = Some(price),
            _ => violations.push(
                "price",
                "price must be a number conforming to the specified constraints",
            ),
        },
        Some(_) => violations.push(
            "price",
            "price must be a number conforming to the specified constraints",
        ),
    }

    match object.get("availability") {
        None | Some(Value::Null) => {}
        Some(Value::Bool(availability)) => dto.availability = Some(*availability),
        Some(_) => violations.push("availability", "availability must be a boolean value"),
    }

    dto
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages(payload: Value) -> Vec<String> {
        match validate_create_payload(&payload) {
            Err(CoreError::Validation(messages)) => messages,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_full_payload() {
        let product = validate_create_payload(&json!({
            "name": "Laptop Pro",
            "description": "High-performance laptop with 16GB RAM and 512GB SSD",
            "price": 1299.99,
            "availability": true
        }))
        .unwrap();

        assert_eq!(product.name, "Laptop Pro");
        assert_eq!(product.price, Some(1299.99));
        assert_eq!(product.availability, Some(true));
    }

    #[test]
    fn accepts_name_only_and_leaves_optionals_unset() {
        let product = validate_create_payload(&json!({ "name": "Minimal Product" })).unwrap();
        assert_eq!(product, NewProduct::named("Minimal Product"));
    }

    #[test]
    fn null_optionals_count_as_absent() {
        let product = validate_create_payload(&json!({
            "name": "Widget",
            "description": null,
            "price": null,
            "availability": null
        }))
        .unwrap();

        assert_eq!(product, NewProduct::named("Widget"));
    }

    #[test]
    fn trims_name() {
        let product = validate_create_payload(&json!({ "name": "  Widget  " })).unwrap();
        assert_eq!(product.name, "Widget");
    }

    #[test]
    fn integer_price_is_accepted() {
        let product = validate_create_payload(&json!({ "name": "Widget", "price": 5 })).unwrap();
        assert_eq!(product.price, Some(5.0));
    }

    #[test]
    fn missing_name_is_rejected() {
        let reported = messages(json!({ "description": "Missing name" }));
        assert_eq!(
            reported,
            vec!["name must be a string", "name should not be empty"]
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let reported = messages(json!({ "name": "   " }));
        assert_eq!(reported, vec!["name should not be empty"]);
    }

    #[test]
    fn name_length_boundary() {
        let at_limit = "a".repeat(NAME_MAX_LEN);
        assert!(validate_create_payload(&json!({ "name": at_limit })).is_ok());

        let over_limit = "a".repeat(NAME_MAX_LEN + 1);
        assert_eq!(
            messages(json!({ "name": over_limit })),
            vec!["name must be shorter than or equal to 200 characters"]
        );
    }

    #[test]
    fn description_length_boundaries() {
        assert_eq!(
            messages(json!({ "name": "Widget", "description": "" })),
            vec!["description must be between 1 and 1000 characters"]
        );

        let at_limit = "d".repeat(DESCRIPTION_MAX_LEN);
        assert!(validate_create_payload(&json!({ "name": "Widget", "description": at_limit })).is_ok());

        let over_limit = "d".repeat(DESCRIPTION_MAX_LEN + 1);
        assert_eq!(
            messages(json!({ "name": "Widget", "description": over_limit })),
            vec!["description must be between 1 and 1000 characters"]
        );
    }

    #[test]
    fn price_minimum() {
        assert!(validate_create_payload(&json!({ "name": "Widget", "price": 0.01 })).is_ok());
        assert_eq!(
            messages(json!({ "name": "Widget", "price": 0 })),
            vec!["price must not be less than 0.01"]
        );
        assert_eq!(
            messages(json!({ "name": "Widget", "price": -3.5 })),
            vec!["price must not be less than 0.01"]
        );
    }

    #[test]
    fn wrong_types_are_reported() {
        let reported = messages(json!({
            "name": 42,
            "description": false,
            "price": "9.99",
            "availability": "yes"
        }));

        assert_eq!(
            reported,
            vec![
                "name must be a string",
                "name should not be empty",
                "description must be a string",
                "price must be a number conforming to the specified constraints",
                "availability must be a boolean value",
            ]
        );
    }

    #[test]
    fn unknown_fields_are_rejected_first() {
        let single = messages(json!({ "name": "Widget", "sku": "W-1" }));
        assert_eq!(single, vec!["property sku should not exist"]);

        let mixed = messages(json!({ "colour": "red", "price": 0 }));
        assert_eq!(mixed[0], "property colour should not exist");
        assert_eq!(
            &mixed[1..],
            &[
                "name must be a string",
                "name should not be empty",
                "price must not be less than 0.01",
            ]
        );
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert_eq!(
            messages(json!(["name", "Widget"])),
            vec!["request body must be a JSON object"]
        );
    }
}
