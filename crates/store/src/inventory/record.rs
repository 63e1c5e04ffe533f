//! Product records: validation of user input and tolerant decoding of
//! persisted blobs.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value, json};

use stockbook_core::{ProductId, round_to_cents};

use super::error::ValidationError;
use crate::coerce;

/// Persisted field names. They match blobs written by earlier releases.
mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "nombre";
    pub const PRICE: &str = "precio";
    pub const STOCK: &str = "stock";
}

/// One inventory entry.
///
/// Every record satisfies: non-empty trimmed name, unit price `>= 0` with
/// exactly two fractional digits, stock `>= 0`, and a line total that fits in
/// a `Decimal`. Names need not be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    id: ProductId,
    name: String,
    unit_price: Decimal,
    stock: u32,
}

impl ProductRecord {
    /// Build a record from typed values with a freshly generated ID.
    ///
    /// The name is trimmed and the price rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyName`, `ValidationError::NegativePrice`
    /// or `ValidationError::TotalTooLarge`.
    pub fn new(name: &str, unit_price: Decimal, stock: u32) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if unit_price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice);
        }
        let unit_price = round_to_cents(unit_price);
        checked_line_total(unit_price, stock).ok_or(ValidationError::TotalTooLarge)?;

        Ok(Self {
            id: ProductId::generate(),
            name: name.to_owned(),
            unit_price,
            stock,
        })
    }

    /// Validate raw form input.
    ///
    /// The name is trimmed; price and stock are parsed as decimal numbers
    /// (surrounding whitespace and scientific notation accepted). The price
    /// is rounded to cents and the stock truncated toward zero.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` describing the first offending field, checked
    /// in the order name, price, stock.
    pub fn validate(name: &str, price: &str, stock: &str) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let unit_price = coerce::parse_decimal(price)
            .ok_or_else(|| ValidationError::InvalidPrice(price.to_owned()))?;
        if unit_price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice);
        }

        let stock_value = coerce::parse_decimal(stock)
            .ok_or_else(|| ValidationError::InvalidStock(stock.to_owned()))?;
        let stock_value = stock_value.trunc();
        if stock_value < Decimal::ZERO {
            return Err(ValidationError::NegativeStock);
        }
        let stock = stock_value
            .to_u32()
            .ok_or(ValidationError::StockTooLarge { max: u32::MAX })?;

        Self::new(name, unit_price, stock)
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.id
    }

    /// Trimmed product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price, two fractional digits.
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Units in stock.
    #[must_use]
    pub const fn stock(&self) -> u32 {
        self.stock
    }

    /// `unit_price * stock`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        checked_line_total(self.unit_price, self.stock).unwrap_or(Decimal::MAX)
    }

    /// Copy the editable fields of `other`, keeping this record's ID.
    pub(crate) fn apply(&mut self, other: Self) {
        self.name = other.name;
        self.unit_price = other.unit_price;
        self.stock = other.stock;
    }

    pub(crate) fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(fields::ID.to_owned(), json!(self.id.to_string()));
        obj.insert(fields::NAME.to_owned(), json!(self.name));
        obj.insert(fields::PRICE.to_owned(), json!(self.unit_price.to_string()));
        obj.insert(fields::STOCK.to_owned(), json!(self.stock));
        Value::Object(obj)
    }

    /// Tolerant decoding of one persisted entry.
    ///
    /// Returns `None` when the entry must be dropped: not an object, blank
    /// name, a stock too large to represent, or a line total that overflows.
    /// Unreadable or negative
    /// numbers degrade to zero; a missing or invalid `id` gets a fresh one.
    pub(crate) fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let name = coerce::text(obj.get(fields::NAME));
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let unit_price = coerce::number(obj.get(fields::PRICE))
            .map(round_to_cents)
            .filter(|p| *p > Decimal::ZERO)
            .unwrap_or_else(|| round_to_cents(Decimal::ZERO));

        let stock = match coerce::number(obj.get(fields::STOCK)).map(|s| s.trunc()) {
            Some(s) if s > Decimal::ZERO => s.to_u32()?,
            _ => 0,
        };
        checked_line_total(unit_price, stock)?;

        Some(Self {
            id: read_id(obj).unwrap_or_else(ProductId::generate),
            name: name.to_owned(),
            unit_price,
            stock,
        })
    }
}

fn checked_line_total(unit_price: Decimal, stock: u32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(stock))
}

fn read_id(obj: &Map<String, Value>) -> Option<ProductId> {
    obj.get(fields::ID)?.as_str()?.parse().ok()
}
