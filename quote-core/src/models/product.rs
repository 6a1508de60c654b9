use serde::{Deserialize, Serialize};

use rust_decimal::Decimal;

/// How a product's price is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceUnit {
    #[default]
    Unit,
    LinearMeter,
    SquareMeter,
}

impl PriceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unit => "UNIT",
            Self::LinearMeter => "LINEAR_METER",
            Self::SquareMeter => "SQUARE_METER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNIT" | "EACH" => Some(Self::Unit),
            "LINEAR_METER" | "LM" => Some(Self::LinearMeter),
            "SQUARE_METER" | "SQM" | "M2" => Some(Self::SquareMeter),
            _ => None,
        }
    }
}

/// A catalog product as supplied by the catalog collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub base_price: Decimal,
    pub price_unit: PriceUnit,
    pub category: String,
}
