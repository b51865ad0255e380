//! Request field parsing.
//!
//! The bundled front-end posts form values as strings, so numeric and date
//! fields accept either JSON numbers or numeric strings. Blank strings count
//! as absent.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::errors::DomainError;

fn blank_to_none(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(other),
    }
}

pub fn opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = blank_to_none(Value::deserialize(deserializer)?) else {
        return Ok(None);
    };
    let parsed = match &value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("se esperaba un número entero, se recibió {value}")))
}

pub fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = blank_to_none(Value::deserialize(deserializer)?) else {
        return Ok(None);
    };
    let parsed = match &value {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("se esperaba un número decimal, se recibió {value}")))
}

pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = blank_to_none(Value::deserialize(deserializer)?) else {
        return Ok(None);
    };
    match &value {
        Value::String(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("fecha inválida '{s}', se esperaba AAAA-MM-DD"))),
        _ => Err(de::Error::custom(format!(
            "se esperaba una fecha AAAA-MM-DD, se recibió {value}"
        ))),
    }
}

pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match blank_to_none(Value::deserialize(deserializer)?) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("se esperaba texto, se recibió {other}"))),
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Collects the names of absent required fields so they are reported together.
#[derive(Debug, Default)]
pub struct Fields {
    missing: Vec<&'static str>,
}

impl Fields {
    pub fn require<T>(&mut self, name: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(name);
        }
        value
    }

    /// Fails with every missing name, or runs `build` once all are present.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, DomainError> {
        if !self.missing.is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "Faltan campos requeridos: {}.",
                self.missing.join(", ")
            )));
        }
        build().ok_or_else(|| DomainError::InvalidInput("Faltan campos requeridos.".to_string()))
    }
}
