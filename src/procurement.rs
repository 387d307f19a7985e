//! Procurement entities and their filter schemas.
//!
//! Locations hold goods; conversions and calculations are documents booked
//! against a location; purchase costs are charged on a conversion; articles
//! are the lines of a calculation. Field paths
//! are camelCase as they arrive from the search UI, e.g. `location.name` or
//! `calculation.location.address`.

use chrono::{NaiveDate, NaiveDateTime};

use crate::predicate::{Field, Record};
use crate::schema::{Attribute, AttributeSchema, EntitySchema, SemanticType};
use crate::value::{Decimal, Value};

// ------------- Location -------------
const LOCATION_ATTRIBUTES: &[Attribute] = &[
    Attribute::scalar("locationId", "id", SemanticType::Integer),
    Attribute::scalar("name", "name", SemanticType::Text),
    Attribute::scalar("address", "address", SemanticType::Text),
];
pub const LOCATION: EntitySchema = EntitySchema::new("Location", "location", "id", LOCATION_ATTRIBUTES);

#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub address: String,
}

impl AttributeSchema for Location {
    fn schema() -> &'static EntitySchema {
        &LOCATION
    }
}
impl Record for Location {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        let value = match name {
            "locationId" => Value::Integer(self.id),
            "name" => Value::from(self.name.as_str()),
            "address" => Value::from(self.address.as_str()),
            _ => return None,
        };
        Some(value.into())
    }
}

// ------------- Conversion -------------
const CONVERSION_ATTRIBUTES: &[Attribute] = &[
    Attribute::scalar("conversionId", "id", SemanticType::Integer),
    Attribute::scalar("conversionNumber", "number", SemanticType::Text),
    Attribute::scalar("date", "date", SemanticType::Date),
    Attribute::scalar("currency", "currency", SemanticType::Text),
    Attribute::scalar("supplierId", "supplier_id", SemanticType::Integer),
    Attribute::scalar("total", "total", SemanticType::Decimal),
    Attribute::join("location", "location_id", &LOCATION),
];
pub const CONVERSION: EntitySchema = EntitySchema::new("Conversion", "conversion", "id", CONVERSION_ATTRIBUTES);

/// Conversion of purchase costs into the booking currency.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub id: i64,
    pub number: String,
    pub date: NaiveDate,
    pub currency: String,
    pub supplier_id: i64,
    pub total: Decimal,
    pub location: Option<Location>,
}

impl AttributeSchema for Conversion {
    fn schema() -> &'static EntitySchema {
        &CONVERSION
    }
}
impl Record for Conversion {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        let value = match name {
            "conversionId" => Value::Integer(self.id),
            "conversionNumber" => Value::from(self.number.as_str()),
            "date" => Value::Date(self.date),
            "currency" => Value::from(self.currency.as_str()),
            "supplierId" => Value::Integer(self.supplier_id),
            "total" => Value::Decimal(self.total.clone()),
            "location" => return self.location.as_ref().map(|l| Field::Related(l)),
            _ => return None,
        };
        Some(value.into())
    }
}

// ------------- Purchase cost -------------
const PURCHASE_COST_ATTRIBUTES: &[Attribute] = &[
    Attribute::scalar("purchaseCostId", "id", SemanticType::Integer),
    Attribute::scalar("name", "name", SemanticType::Text),
    Attribute::scalar("price", "price", SemanticType::Decimal),
    Attribute::join("conversion", "conversion_id", &CONVERSION),
];
pub const PURCHASE_COST: EntitySchema =
    EntitySchema::new("PurchaseCost", "purchase_cost", "id", PURCHASE_COST_ATTRIBUTES);

/// A cost (freight, customs, ...) charged on top of a conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseCost {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub conversion: Option<Conversion>,
}

impl AttributeSchema for PurchaseCost {
    fn schema() -> &'static EntitySchema {
        &PURCHASE_COST
    }
}
impl Record for PurchaseCost {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        let value = match name {
            "purchaseCostId" => Value::Integer(self.id),
            "name" => Value::from(self.name.as_str()),
            "price" => Value::Decimal(self.price.clone()),
            "conversion" => return self.conversion.as_ref().map(|c| Field::Related(c)),
            _ => return None,
        };
        Some(value.into())
    }
}

// ------------- Calculation -------------
pub const CALCULATION_KINDS: &[&str] = &["RETAIL", "WHOLESALE"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalculationKind {
    Retail,
    Wholesale,
}
impl CalculationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationKind::Retail => CALCULATION_KINDS[0],
            CalculationKind::Wholesale => CALCULATION_KINDS[1],
        }
    }
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RETAIL" => Some(CalculationKind::Retail),
            "WHOLESALE" => Some(CalculationKind::Wholesale),
            _ => None,
        }
    }
}

const CALCULATION_ATTRIBUTES: &[Attribute] = &[
    Attribute::scalar("calculationId", "id", SemanticType::Integer),
    Attribute::scalar("calculationNumber", "number", SemanticType::Text),
    Attribute::scalar("date", "booked_at", SemanticType::DateTime),
    Attribute::scalar("currency", "currency", SemanticType::Text),
    Attribute::scalar("calculationKind", "kind", SemanticType::Enumerated(CALCULATION_KINDS)),
    Attribute::scalar("total", "total", SemanticType::Decimal),
    Attribute::scalar("closed", "closed", SemanticType::Boolean),
    Attribute::join("location", "location_id", &LOCATION),
];
pub const CALCULATION: EntitySchema = EntitySchema::new("Calculation", "calculation", "id", CALCULATION_ATTRIBUTES);

/// Pricing calculation for a delivery of goods.
#[derive(Clone, Debug, PartialEq)]
pub struct Calculation {
    pub id: i64,
    pub number: String,
    pub date: NaiveDateTime,
    pub currency: String,
    pub kind: CalculationKind,
    pub total: Decimal,
    pub closed: bool,
    pub location: Option<Location>,
}

impl AttributeSchema for Calculation {
    fn schema() -> &'static EntitySchema {
        &CALCULATION
    }
}
impl Record for Calculation {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        let value = match name {
            "calculationId" => Value::Integer(self.id),
            "calculationNumber" => Value::from(self.number.as_str()),
            "date" => Value::DateTime(self.date),
            "currency" => Value::from(self.currency.as_str()),
            "calculationKind" => Value::Enumerated(self.kind.as_str().to_string()),
            "total" => Value::Decimal(self.total.clone()),
            "closed" => Value::Boolean(self.closed),
            "location" => return self.location.as_ref().map(|l| Field::Related(l)),
            _ => return None,
        };
        Some(value.into())
    }
}

// ------------- Article -------------
const ARTICLE_ATTRIBUTES: &[Attribute] = &[
    Attribute::scalar("articleId", "id", SemanticType::Integer),
    Attribute::scalar("articleCode", "code", SemanticType::Text),
    Attribute::scalar("articleName", "name", SemanticType::Text),
    Attribute::scalar("unit", "unit", SemanticType::Text),
    Attribute::scalar("quantity", "quantity", SemanticType::Integer),
    Attribute::scalar("purchasePrice", "purchase_price", SemanticType::Decimal),
    Attribute::scalar("discountPercent", "discount_percent", SemanticType::Decimal),
    Attribute::join("calculation", "calculation_id", &CALCULATION),
];
pub const ARTICLE: EntitySchema = EntitySchema::new("Article", "article", "id", ARTICLE_ATTRIBUTES);

/// One line of a calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct Article {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub unit: String,
    pub quantity: i64,
    pub purchase_price: Decimal,
    pub discount_percent: Option<Decimal>,
    pub calculation: Option<Calculation>,
}

impl AttributeSchema for Article {
    fn schema() -> &'static EntitySchema {
        &ARTICLE
    }
}
impl Record for Article {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        let value = match name {
            "articleId" => Value::Integer(self.id),
            "articleCode" => Value::from(self.code.as_str()),
            "articleName" => Value::from(self.name.as_str()),
            "unit" => Value::from(self.unit.as_str()),
            "quantity" => Value::Integer(self.quantity),
            "purchasePrice" => Value::Decimal(self.purchase_price.clone()),
            "discountPercent" => Value::Decimal(self.discount_percent.clone()?),
            "calculation" => return self.calculation.as_ref().map(|c| Field::Related(c)),
            _ => return None,
        };
        Some(value.into())
    }
}
