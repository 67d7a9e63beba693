//! # Requirement Sets
//!
//! The contract between the compliance rule engine and the bid calculator.
//! A [`RequirementSet`] maps each required [`ElementCategory`] to a quantity
//! and a category-specific breakdown. A category that is absent is simply not
//! required by the chosen standard.
//!
//! Requirements are stored in a `BTreeMap`, so iteration and JSON output
//! follow the fixed category order below regardless of insertion order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compliance::Standard;
use crate::project::Material;

/// Kind of protection element a requirement (and a catalog item) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    AirTerminal,
    Conductor,
    ClampFitting,
    GroundRod,
    BondingConnection,
}

impl ElementCategory {
    pub const ALL: [ElementCategory; 5] = [
        ElementCategory::AirTerminal,
        ElementCategory::Conductor,
        ElementCategory::ClampFitting,
        ElementCategory::GroundRod,
        ElementCategory::BondingConnection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementCategory::AirTerminal => "air_terminal",
            ElementCategory::Conductor => "conductor",
            ElementCategory::ClampFitting => "clamp_fitting",
            ElementCategory::GroundRod => "ground_rod",
            ElementCategory::BondingConnection => "bonding_connection",
        }
    }

    /// Unit the requirement quantity is expressed in
    pub fn unit(&self) -> Unit {
        match self {
            ElementCategory::Conductor | ElementCategory::BondingConnection => Unit::Feet,
            ElementCategory::AirTerminal | ElementCategory::ClampFitting | ElementCategory::GroundRod => Unit::Each,
        }
    }

    /// Bid section this category is reported under
    pub fn section(&self) -> &'static str {
        match self {
            ElementCategory::AirTerminal => "Air Terminals",
            ElementCategory::Conductor | ElementCategory::ClampFitting => "Down Conductors & Main Cables",
            ElementCategory::GroundRod => "Grounding System",
            ElementCategory::BondingConnection => "Bonding Connections",
        }
    }

    /// Catalog code prefixes recognized for this category (upper case)
    pub fn code_prefixes(&self) -> &'static [&'static str] {
        match self {
            ElementCategory::AirTerminal => &["AT"],
            ElementCategory::Conductor => &["COND"],
            ElementCategory::ClampFitting => &["CLAMP", "FIT"],
            ElementCategory::GroundRod => &["GR"],
            ElementCategory::BondingConnection => &["BOND"],
        }
    }

    /// Item-name keywords recognized for this category (lower case)
    pub fn name_keywords(&self) -> &'static [&'static str] {
        match self {
            ElementCategory::AirTerminal => &["air terminal", "lightning rod", "strike termination"],
            ElementCategory::Conductor => &["conductor", "cable", "downlead"],
            ElementCategory::ClampFitting => &["clamp", "fitting", "connector", "fastener"],
            ElementCategory::GroundRod => &["ground rod", "grounding rod", "electrode"],
            ElementCategory::BondingConnection => &["bonding", "bond"],
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Quantity unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "ea")]
    Each,
    #[serde(rename = "ft")]
    Feet,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Each => "ea",
            Unit::Feet => "ft",
        }
    }

    /// Whether a catalog pricing unit ("ea", "EACH", "lf", ...) means this unit.
    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.trim().to_ascii_lowercase();
        let aliases: &[&str] = match self {
            Unit::Each => &["ea", "each", "pc", "pcs"],
            Unit::Feet => &["ft", "feet", "foot", "lf"],
        };
        aliases.contains(&label.as_str())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Category-specific breakdown of a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementDetail {
    AirTerminals {
        corners: u32,
        edges: u32,
        field: u32,
        /// Edge spacing actually applied (ft)
        max_spacing_ft: f64,
        /// Unsupported field area per terminal (sqft)
        field_area_sqft: f64,
    },
    Conductors {
        down_conductors: u32,
        perimeter_run_ft: f64,
        vertical_run_ft: f64,
        service_margin_ft: f64,
    },
    Fittings {
        support_spacing_ft: f64,
    },
    GroundRods {
        rod_depth_ft: f64,
        ground_ring: bool,
        ground_ring_length_ft: Option<f64>,
    },
    Bonding {
        connections: u32,
        wire_size_awg: u32,
    },
}

/// One required element category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub category: ElementCategory,

    /// Always >= 0, in `unit`
    pub quantity: f64,

    pub unit: Unit,

    pub detail: RequirementDetail,

    /// Human-readable justification (e.g., "UL 96A: max 20 ft spacing")
    pub note: String,
}

impl Requirement {
    pub fn new(category: ElementCategory, quantity: f64, detail: RequirementDetail, note: impl Into<String>) -> Self {
        Requirement {
            category,
            quantity: quantity.max(0.0),
            unit: category.unit(),
            detail,
            note: note.into(),
        }
    }
}

/// Output of one compliance computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    pub standard: Standard,
    pub project_name: String,
    pub preferred_material: Material,
    requirements: BTreeMap<ElementCategory, Requirement>,
}

impl RequirementSet {
    pub fn new(standard: Standard, project_name: impl Into<String>, preferred_material: Material) -> Self {
        RequirementSet {
            standard,
            project_name: project_name.into(),
            preferred_material,
            requirements: BTreeMap::new(),
        }
    }

    /// Add or replace the requirement for its category.
    pub fn insert(&mut self, requirement: Requirement) {
        self.requirements.insert(requirement.category, requirement);
    }

    pub fn get(&self, category: ElementCategory) -> Option<&Requirement> {
        self.requirements.get(&category)
    }

    pub fn contains(&self, category: ElementCategory) -> bool {
        self.requirements.contains_key(&category)
    }

    /// Quantity for a category, 0 when not required.
    pub fn quantity(&self, category: ElementCategory) -> f64 {
        self.get(category).map(|r| r.quantity).unwrap_or(0.0)
    }

    /// Requirements in category order.
    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.values()
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn air_terminal_total(&self) -> u32 {
        self.quantity(ElementCategory::AirTerminal) as u32
    }

    pub fn down_conductors(&self) -> u32 {
        match self.get(ElementCategory::Conductor).map(|r| &r.detail) {
            Some(RequirementDetail::Conductors { down_conductors, .. }) => *down_conductors,
            _ => 0,
        }
    }

    pub fn ground_ring_required(&self) -> bool {
        matches!(
            self.get(ElementCategory::GroundRod).map(|r| &r.detail),
            Some(RequirementDetail::GroundRods { ground_ring: true, .. })
        )
    }
}

impl<'a> IntoIterator for &'a RequirementSet {
    type Item = &'a Requirement;
    type IntoIter = std::collections::btree_map::Values<'a, ElementCategory, Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.requirements.values()
    }
}
