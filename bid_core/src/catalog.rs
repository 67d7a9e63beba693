//! # Parts Catalog
//!
//! Read-only lookup of priced items. Items keep their insertion order and are
//! indexed once, at construction, by the element category they supply, so
//! matching a requirement never rescans the whole list.
//!
//! An item's category is its declared `category` when present. Otherwise it
//! is inferred from the code prefix (`AT-001`, `COND-100`, `GR-10`,
//! `BOND-6`, `CLAMP-01`) and then from keywords in the item name. Items that
//! resolve to no category stay in the catalog but are never matched.
//!
//! ## Example
//!
//! ```rust
//! use bid_core::catalog::{Catalog, PriceItem};
//! use bid_core::project::Material;
//! use bid_core::requirements::ElementCategory;
//!
//! let catalog = Catalog::new(vec![
//!     PriceItem::new("AT-002", "Air Terminal - Aluminum", "ea", 30.0, 15.0),
//!     PriceItem::new("AT-001", "Air Terminal - Copper", "ea", 45.0, 15.0),
//! ]).unwrap();
//!
//! let item = catalog.find(ElementCategory::AirTerminal, Some(Material::Copper)).unwrap();
//! assert_eq!(item.code, "AT-001");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{CalcError, CalcResult};
use crate::project::Material;
use crate::requirements::ElementCategory;

/// Keyword inference order. Specific parts come before generic ones, so a
/// "Cable Clamp" is a fitting rather than conductor.
const KEYWORD_ORDER: [ElementCategory; 5] = [
    ElementCategory::ClampFitting,
    ElementCategory::BondingConnection,
    ElementCategory::GroundRod,
    ElementCategory::AirTerminal,
    ElementCategory::Conductor,
];

/// One catalog entry.
///
/// ## JSON Example
///
/// ```json
/// {
///   "code": "COND-100",
///   "name": "Conductor Cable - Copper 4/0 AWG",
///   "unit": "ft",
///   "unit_price": 3.5,
///   "labor_rate": 2.0,
///   "material": "copper"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceItem {
    /// Unique part code
    pub code: String,

    pub name: String,

    /// Pricing unit ("ea", "ft", ...)
    pub unit: String,

    /// Material cost per unit ($)
    pub unit_price: f64,

    /// Installation labor per unit ($)
    #[serde(default)]
    pub labor_rate: f64,

    /// Declared element category, overriding code/name inference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ElementCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
}

impl PriceItem {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        unit_price: f64,
        labor_rate: f64,
    ) -> Self {
        PriceItem {
            code: code.into(),
            name: name.into(),
            unit: unit.into(),
            unit_price,
            labor_rate,
            category: None,
            material: None,
        }
    }

    pub fn with_category(mut self, category: ElementCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Declared category, else code prefix, else name keyword.
    pub fn resolved_category(&self) -> Option<ElementCategory> {
        if self.category.is_some() {
            return self.category;
        }

        let code = self.code.trim().to_ascii_uppercase();
        let by_code = ElementCategory::ALL.into_iter().find(|category| {
            category
                .code_prefixes()
                .iter()
                .any(|prefix| has_code_prefix(&code, prefix))
        });
        if by_code.is_some() {
            return by_code;
        }

        let name = self.name.to_lowercase();
        KEYWORD_ORDER
            .into_iter()
            .find(|category| category.name_keywords().iter().any(|kw| name.contains(kw)))
    }

    /// Declared material, else a material named in the item name.
    pub fn resolved_material(&self) -> Option<Material> {
        if self.material.is_some() {
            return self.material;
        }
        let name = self.name.to_lowercase();
        if name.contains("copper") {
            Some(Material::Copper)
        } else if name.contains("aluminum") || name.contains("aluminium") {
            Some(Material::Aluminum)
        } else {
            None
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.code.trim().is_empty() {
            return Err(CalcError::invalid_input("code", self.code.clone(), "Item code cannot be blank"));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(CalcError::invalid_input(
                format!("{}.unit_price", self.code),
                self.unit_price.to_string(),
                "Unit price must be non-negative",
            ));
        }
        if !self.labor_rate.is_finite() || self.labor_rate < 0.0 {
            return Err(CalcError::invalid_input(
                format!("{}.labor_rate", self.code),
                self.labor_rate.to_string(),
                "Labor rate must be non-negative",
            ));
        }
        Ok(())
    }
}

/// `AT-001` and `AT001` carry prefix `AT`; `ATTIC-FAN` does not.
fn has_code_prefix(code: &str, prefix: &str) -> bool {
    match code.strip_prefix(prefix) {
        Some(rest) => rest.chars().next().map_or(true, |c| !c.is_ascii_alphabetic()),
        None => false,
    }
}

/// Immutable, category-indexed collection of price items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceItem>", into = "Vec<PriceItem>")]
pub struct Catalog {
    items: Vec<PriceItem>,
    by_code: HashMap<String, usize>,
    by_category: HashMap<ElementCategory, Vec<usize>>,
}

impl Catalog {
    /// Build a catalog, validating prices.
    ///
    /// Duplicate codes are logged; lookups by code return the first one.
    pub fn new(items: Vec<PriceItem>) -> CalcResult<Self> {
        let mut by_code = HashMap::with_capacity(items.len());
        let mut by_category: HashMap<ElementCategory, Vec<usize>> = HashMap::new();

        for (idx, item) in items.iter().enumerate() {
            item.validate()?;
            if by_code.contains_key(&item.code) {
                warn!(code = %item.code, "duplicate catalog code, keeping first entry");
            } else {
                by_code.insert(item.code.clone(), idx);
            }
            if let Some(category) = item.resolved_category() {
                by_category.entry(category).or_default().push(idx);
            }
        }

        Ok(Catalog {
            items,
            by_code,
            by_category,
        })
    }

    pub fn empty() -> Self {
        Catalog::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[PriceItem] {
        &self.items
    }

    pub fn get(&self, code: &str) -> Option<&PriceItem> {
        self.by_code.get(code).map(|&idx| &self.items[idx])
    }

    /// Items supplying `category`, in insertion order.
    pub fn candidates(&self, category: ElementCategory) -> impl Iterator<Item = &PriceItem> {
        self.by_category
            .get(&category)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.items[idx])
    }

    /// Best item for `category`: the first in the preferred material, else the
    /// first candidate.
    pub fn find(&self, category: ElementCategory, preferred: Option<Material>) -> Option<&PriceItem> {
        if let Some(material) = preferred {
            if let Some(item) = self
                .candidates(category)
                .find(|item| item.resolved_material() == Some(material))
            {
                return Some(item);
            }
        }
        self.candidates(category).next()
    }
}

impl TryFrom<Vec<PriceItem>> for Catalog {
    type Error = CalcError;

    fn try_from(items: Vec<PriceItem>) -> CalcResult<Self> {
        Catalog::new(items)
    }
}

impl From<Catalog> for Vec<PriceItem> {
    fn from(catalog: Catalog) -> Self {
        catalog.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            PriceItem::new("AT-001", "Air Terminal - Copper", "ea", 45.0, 15.0),
            PriceItem::new("COND-100", "Conductor Cable - Copper 4/0 AWG", "ft", 3.5, 2.0),
            PriceItem::new("GR-10", "Ground Rod - 10ft Copper", "ea", 65.0, 50.0),
            PriceItem::new("CLAMP-01", "Cable Clamp", "ea", 8.0, 5.0),
            PriceItem::new("BOND-6", "Bonding Wire #6 AWG", "ft", 2.0, 1.5),
        ])
        .unwrap()
    }

    #[test]
    fn test_category_from_code_prefix() {
        let catalog = sample();
        assert_eq!(catalog.find(ElementCategory::AirTerminal, None).unwrap().code, "AT-001");
        assert_eq!(catalog.find(ElementCategory::Conductor, None).unwrap().code, "COND-100");
        assert_eq!(catalog.find(ElementCategory::GroundRod, None).unwrap().code, "GR-10");
        assert_eq!(catalog.find(ElementCategory::ClampFitting, None).unwrap().code, "CLAMP-01");
        assert_eq!(catalog.find(ElementCategory::BondingConnection, None).unwrap().code, "BOND-6");
    }

    #[test]
    fn test_category_from_name_keywords() {
        assert_eq!(
            PriceItem::new("X1", "Cable Clamp, bronze", "ea", 1.0, 1.0).resolved_category(),
            Some(ElementCategory::ClampFitting)
        );
        assert_eq!(
            PriceItem::new("X2", "Copper Lightning Rod 24in", "ea", 1.0, 1.0).resolved_category(),
            Some(ElementCategory::AirTerminal)
        );
        assert_eq!(
            PriceItem::new("X3", "Main Conductor, 32 strand", "ft", 1.0, 1.0).resolved_category(),
            Some(ElementCategory::Conductor)
        );
        assert_eq!(PriceItem::new("X4", "Crane rental", "day", 1.0, 0.0).resolved_category(), None);
    }

    #[test]
    fn test_code_prefix_needs_boundary() {
        let item = PriceItem::new("ATTIC-FAN", "Attic fan", "ea", 1.0, 1.0);
        assert_eq!(item.resolved_category(), None);
        let item = PriceItem::new("at002", "Something", "ea", 1.0, 1.0);
        assert_eq!(item.resolved_category(), Some(ElementCategory::AirTerminal));
    }

    #[test]
    fn test_declared_category_wins() {
        let item = PriceItem::new("AT-9", "Misfiled", "ea", 1.0, 1.0).with_category(ElementCategory::GroundRod);
        assert_eq!(item.resolved_category(), Some(ElementCategory::GroundRod));
    }

    #[test]
    fn test_material_preference_then_insertion_order() {
        let catalog = Catalog::new(vec![
            PriceItem::new("COND-AL", "Conductor - Aluminum", "ft", 1.5, 2.0),
            PriceItem::new("COND-CU", "Conductor - Copper", "ft", 3.5, 2.0),
            PriceItem::new("COND-CU2", "Conductor - Copper heavy", "ft", 4.5, 2.0),
        ])
        .unwrap();
        assert_eq!(
            catalog.find(ElementCategory::Conductor, Some(Material::Copper)).unwrap().code,
            "COND-CU"
        );
        assert_eq!(
            catalog.find(ElementCategory::Conductor, Some(Material::Aluminum)).unwrap().code,
            "COND-AL"
        );
        assert_eq!(catalog.find(ElementCategory::Conductor, None).unwrap().code, "COND-AL");
    }

    #[test]
    fn test_preference_falls_back_to_first() {
        let catalog = sample();
        let clamp = catalog.find(ElementCategory::ClampFitting, Some(Material::Aluminum)).unwrap();
        assert_eq!(clamp.code, "CLAMP-01");
    }

    #[test]
    fn test_duplicate_codes_keep_first() {
        let catalog = Catalog::new(vec![
            PriceItem::new("AT-001", "Air Terminal A", "ea", 10.0, 1.0),
            PriceItem::new("AT-001", "Air Terminal B", "ea", 20.0, 1.0),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("AT-001").unwrap().name, "Air Terminal A");
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = Catalog::new(vec![PriceItem::new("AT-1", "Air Terminal", "ea", -1.0, 0.0)]).unwrap_err();
        assert_eq!(err.field(), Some("AT-1.unit_price"));
    }

    #[test]
    fn test_empty_catalog_finds_nothing() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.find(ElementCategory::AirTerminal, Some(Material::Copper)).is_none());
    }

    #[test]
    fn test_catalog_serializes_as_item_list() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.starts_with('['));
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 5);
        assert_eq!(back.find(ElementCategory::GroundRod, None).unwrap().code, "GR-10");
    }
}
