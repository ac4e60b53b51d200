//! Positive, unit-less quantities attached to ingredient additions.
//!
//! A `Quantity` can only be constructed from a finite number greater than
//! zero. Input coming from a form field is normalized first (surrounding
//! whitespace trimmed, a decimal comma accepted) so `" 2,5 "` and `2.5`
//! produce the same value. No unit conversion ever happens here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected quantity input. Carries the raw input for error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("quantity must be a positive number, got '{0}'")]
pub struct QuantityError(pub String);

/// A strictly positive amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "QuantityInput", into = "f64")]
pub struct Quantity(f64);

impl Quantity {
    /// Build a quantity from a number, rejecting zero, negatives, NaN and infinities.
    pub fn new(value: f64) -> Result<Self, QuantityError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(QuantityError(value.to_string()))
        }
    }

    /// Normalize and parse free-form text input.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let normalized = input.trim().replace(',', ".");
        if normalized.is_empty() {
            return Err(QuantityError(input.to_string()));
        }
        let value: f64 = normalized
            .parse()
            .map_err(|_| QuantityError(input.to_string()))?;
        Self::new(value).map_err(|_| QuantityError(input.to_string()))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<f64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for f64 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

/// Wire representation: documents written by older clients store
/// quantities as strings, newer ones as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityInput {
    Number(f64),
    Text(String),
}

impl TryFrom<QuantityInput> for Quantity {
    type Error = QuantityError;

    fn try_from(input: QuantityInput) -> Result<Self, Self::Error> {
        match input {
            QuantityInput::Number(n) => Self::new(n),
            QuantityInput::Text(s) => Self::parse(&s),
        }
    }
}
