use std::io::Read;

use quote_core::{HouseType, PriceUnit, Product};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading catalog data.
#[derive(Debug, Error)]
pub enum CatalogLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid price unit '{unit}' for product '{product_id}'")]
    InvalidPriceUnit { product_id: String, unit: String },

    #[error("Duplicate id '{0}'")]
    DuplicateId(String),
}

impl From<csv::Error> for CatalogLoaderError {
    fn from(err: csv::Error) -> Self {
        CatalogLoaderError::CsvParse(err.to_string())
    }
}

/// A single row from the products CSV file.
///
/// - `product_id`: Stable catalog identifier
/// - `name`: Display name copied onto quote items
/// - `sku`: Stock code
/// - `base_price`: Price per `price_unit`
/// - `price_unit`: `UNIT`, `LINEAR_METER` or `SQUARE_METER` (short forms `LM`, `SQM` accepted)
/// - `category`: Free-text grouping
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub base_price: Decimal,
    pub price_unit: String,
    pub category: String,
}

impl TryFrom<ProductRecord> for Product {
    type Error = CatalogLoaderError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let price_unit = PriceUnit::parse(&record.price_unit).ok_or_else(|| {
            CatalogLoaderError::InvalidPriceUnit {
                product_id: record.product_id.clone(),
                unit: record.price_unit.clone(),
            }
        })?;

        Ok(Product {
            product_id: record.product_id,
            name: record.name,
            sku: record.sku,
            base_price: record.base_price,
            price_unit,
            category: record.category,
        })
    }
}

/// A single row from the house types CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HouseTypeRecord {
    pub house_type_id: String,
    pub name: String,
    pub allowance_amount: Decimal,
}

impl From<HouseTypeRecord> for HouseType {
    fn from(record: HouseTypeRecord) -> Self {
        HouseType {
            house_type_id: record.house_type_id,
            name: record.name,
            allowance_amount: record.allowance_amount,
        }
    }
}

/// Loader for catalog and house type data from CSV files.
///
/// Rows keep their file order. Ids must be unique within a file.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Parse products from a CSV reader.
    pub fn parse_products<R: Read>(reader: R) -> Result<Vec<Product>, CatalogLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut products: Vec<Product> = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ProductRecord = result?;
            if products.iter().any(|p| p.product_id == record.product_id) {
                return Err(CatalogLoaderError::DuplicateId(record.product_id));
            }
            products.push(Product::try_from(record)?);
        }

        Ok(products)
    }

    /// Parse house types from a CSV reader.
    pub fn parse_house_types<R: Read>(reader: R) -> Result<Vec<HouseType>, CatalogLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut house_types: Vec<HouseType> = Vec::new();

        for result in csv_reader.deserialize() {
            let record: HouseTypeRecord = result?;
            if house_types
                .iter()
                .any(|h| h.house_type_id == record.house_type_id)
            {
                return Err(CatalogLoaderError::DuplicateId(record.house_type_id));
            }
            house_types.push(record.into());
        }

        Ok(house_types)
    }
}
