use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A house type and the allowance that seeds a quote's subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseType {
    pub house_type_id: String,
    pub name: String,
    pub allowance_amount: Decimal,
}
