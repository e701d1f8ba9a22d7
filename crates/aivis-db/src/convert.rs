//! Column-level conversions between domain values and their SQL encodings.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::DbError;

pub(crate) fn count_to_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

pub(crate) fn count_from_db(column: &'static str, value: i32) -> Result<u32, DbError> {
    u32::try_from(value).map_err(|_| DbError::InvalidRow {
        column,
        reason: format!("negative count {value}"),
    })
}

pub(crate) fn score_from_db(column: &'static str, value: i32) -> Result<u8, DbError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| DbError::InvalidRow {
            column,
            reason: format!("score {value} outside 0..=100"),
        })
}

/// Fixed-point encoding of a float at `dp` decimal places. Non-finite input
/// is stored as zero.
pub(crate) fn decimal_from_f64(value: f64, dp: u32) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp(dp)
}

pub(crate) fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

pub(crate) fn to_json<T: Serialize>(
    column: &'static str,
    value: &T,
) -> Result<serde_json::Value, DbError> {
    serde_json::to_value(value).map_err(|e| DbError::InvalidRow {
        column,
        reason: e.to_string(),
    })
}

pub(crate) fn from_json<T: DeserializeOwned>(
    column: &'static str,
    value: serde_json::Value,
) -> Result<T, DbError> {
    serde_json::from_value(value).map_err(|e| DbError::InvalidRow {
        column,
        reason: e.to_string(),
    })
}
