//! The `Item` record and the client-supplied fields it is built from.

use crate::error::{Error, FieldError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Allowed length of `name`, in characters.
pub const NAME_LEN: std::ops::RangeInclusive<usize> = 1..=50;
/// Allowed length of `description`, in characters.
pub const DESCRIPTION_LEN: std::ops::RangeInclusive<usize> = 1..=200;

/// A stored item. The `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// System-assigned identifier, unique within a store.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Unit price, always > 0.
    pub price: f64,
}

impl Item {
    /// Attach `id` to a set of fields.
    pub fn from_fields(id: u64, fields: ItemFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
        }
    }
}

/// What a client sends on create and update: everything but the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFields {
    /// 1 to 50 characters.
    pub name: String,
    /// 1 to 200 characters.
    pub description: String,
    /// Strictly positive.
    pub price: f64,
}

impl ItemFields {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
        }
    }

    /// Check every field constraint, collecting all violations.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        check_len("name", &self.name, NAME_LEN, &mut errors);
        check_len("description", &self.description, DESCRIPTION_LEN, &mut errors);
        check_price(self.price, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }

    /// Build from a raw request body.
    ///
    /// Reports missing fields and wrong types per field instead of failing on
    /// the first one, then runs [`validate`](Self::validate). Unknown keys
    /// (including a client-supplied `id`) are ignored.
    ///
    /// Scalars are coerced the lenient way: a number given for `name` or
    /// `description` becomes its decimal text, and a numeric string given for
    /// `price` is parsed. Booleans, arrays and objects are rejected.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            Error::Validation(vec![FieldError::whole_body(
                e.to_string(),
                "value_error.jsondecode",
            )])
        })?;
        let Some(obj) = value.as_object() else {
            return Err(Error::Validation(vec![FieldError::whole_body(
                "value is not a valid dict",
                "type_error.dict",
            )]));
        };

        let mut errors = Vec::new();
        let name = string_field(obj, "name", &mut errors);
        let description = string_field(obj, "description", &mut errors);
        let price = price_field(obj, &mut errors);

        match (name, description, price) {
            (Some(name), Some(description), Some(price)) => {
                let fields = Self {
                    name,
                    description,
                    price,
                };
                fields.validate()?;
                Ok(fields)
            }
            _ => Err(Error::Validation(errors)),
        }
    }
}

fn missing(field: &str) -> FieldError {
    FieldError::body(field, "field required", "value_error.missing")
}

fn string_field(
    obj: &serde_json::Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match obj.get(field) {
        None | Some(Value::Null) => {
            errors.push(missing(field));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            errors.push(FieldError::body(field, "str type expected", "type_error.str"));
            None
        }
    }
}

fn price_field(obj: &serde_json::Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<f64> {
    let parsed = match obj.get("price") {
        None | Some(Value::Null) => {
            errors.push(missing("price"));
            return None;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    if parsed.is_none() {
        errors.push(FieldError::body(
            "price",
            "value is not a valid float",
            "type_error.float",
        ));
    }
    parsed
}

// Lengths count chars, so "é" is one, not two.
fn check_len(
    field: &str,
    value: &str,
    range: std::ops::RangeInclusive<usize>,
    errors: &mut Vec<FieldError>,
) {
    let len = value.chars().count();
    if len < *range.start() {
        errors.push(FieldError::body(
            field,
            format!("ensure this value has at least {} characters", range.start()),
            "value_error.any_str.min_length",
        ));
    } else if len > *range.end() {
        errors.push(FieldError::body(
            field,
            format!("ensure this value has at most {} characters", range.end()),
            "value_error.any_str.max_length",
        ));
    }
}

fn check_price(price: f64, errors: &mut Vec<FieldError>) {
    if !price.is_finite() {
        errors.push(FieldError::body(
            "price",
            "value is not a valid float",
            "type_error.float",
        ));
    } else if price <= 0.0 {
        errors.push(FieldError::body(
            "price",
            "ensure this value is greater than 0",
            "value_error.number.not_gt",
        ));
    }
}
