//! # Compliance Rule Engine
//!
//! Derives a [`RequirementSet`] from a [`ProjectDescriptor`] under one of the
//! supported lightning protection standards.
//!
//! Both standards run the same placement algorithm (see [`rules`]); they
//! differ only in the constants held by their [`StandardRules`] table and in
//! the optional categories those tables switch on (bonding, ground ring).
//!
//! ## Example
//!
//! ```rust
//! use bid_core::compliance::{compute_requirements, Standard};
//! use bid_core::project::ProjectDescriptor;
//!
//! let project = ProjectDescriptor::new("Office", 35.0, 5000.0, 4, 300.0);
//! let standard: Standard = "UL 96A".parse().unwrap();
//!
//! let reqs = compute_requirements(&project, standard).unwrap();
//! assert_eq!(reqs.air_terminal_total(), 24);
//! assert_eq!(reqs.down_conductors(), 2);
//! ```

pub mod nfpa780;
pub mod rules;
pub mod ul96a;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::project::ProjectDescriptor;
use crate::requirements::RequirementSet;

pub use nfpa780::NFPA_780;
pub use ul96a::UL_96A;

/// Per-corner perimeter (ft) treated as already covered by the corner terminal.
pub const CORNER_ALLOWANCE_FT: f64 = 2.0;

/// Fraction added to conductor footage for waste, splices and fittings.
pub const CONDUCTOR_SERVICE_MARGIN: f64 = 0.10;

/// Conductor support (clamp) spacing along every run (ft).
pub const CONDUCTOR_SUPPORT_SPACING_FT: f64 = 3.0;

/// Two independent paths to ground, whatever the building size.
pub const MIN_DOWN_CONDUCTORS: u32 = 2;

/// Bonding wire allowed per bonding connection (ft).
pub const BONDING_WIRE_PER_CONNECTION_FT: f64 = 10.0;

/// Connections added for a metal roof (one per corner of the deck).
pub const METAL_ROOF_BONDING_CONNECTIONS: u32 = 4;

/// Supported lightning protection standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Standard {
    #[serde(rename = "UL 96A")]
    Ul96a,
    #[serde(rename = "NFPA 780")]
    Nfpa780,
}

impl Standard {
    pub const ALL: [Standard; 2] = [Standard::Ul96a, Standard::Nfpa780];

    /// Canonical identifier ("UL 96A", "NFPA 780")
    pub fn code(&self) -> &'static str {
        match self {
            Standard::Ul96a => "UL 96A",
            Standard::Nfpa780 => "NFPA 780",
        }
    }

    /// Constant table for this standard
    pub fn rules(&self) -> &'static StandardRules {
        match self {
            Standard::Ul96a => &UL_96A,
            Standard::Nfpa780 => &NFPA_780,
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Standard {
    type Err = CalcError;

    /// Accepts the canonical identifiers with any case, spacing, `-` or `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "UL96A" => Ok(Standard::Ul96a),
            "NFPA780" => Ok(Standard::Nfpa780),
            _ => Err(CalcError::unknown_standard(s)),
        }
    }
}

/// Named constants of one standard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandardRules {
    pub standard: Standard,

    /// Maximum air terminal spacing along roof edges (ft)
    pub max_spacing_ft: f64,

    /// Maximum unsupported field area per air terminal (sqft)
    pub field_spacing_area_sqft: f64,

    /// Required ground rod depth (ft)
    pub ground_rod_depth_ft: f64,

    /// Roof area above which a ground ring is called for (sqft)
    pub ground_ring_threshold_sqft: Option<f64>,

    /// Whether metal roofs and rooftop bodies must be bonded
    pub requires_bonding: bool,

    /// Minimum bonding conductor size (AWG)
    pub bonding_wire_awg: u32,
}

/// Shared capability of every rule set.
pub trait ComplianceRules {
    /// Validate `project` and derive its requirements.
    ///
    /// Pure: identical input always yields an identical set.
    fn compute_requirements(&self, project: &ProjectDescriptor) -> CalcResult<RequirementSet>;
}

impl ComplianceRules for StandardRules {
    fn compute_requirements(&self, project: &ProjectDescriptor) -> CalcResult<RequirementSet> {
        project.validate()?;
        rules::derive(self, project)
    }
}

impl ComplianceRules for Standard {
    fn compute_requirements(&self, project: &ProjectDescriptor) -> CalcResult<RequirementSet> {
        self.rules().compute_requirements(project)
    }
}

/// Compute requirements for `project` under `standard`.
pub fn compute_requirements(project: &ProjectDescriptor, standard: Standard) -> CalcResult<RequirementSet> {
    standard.compute_requirements(project)
}

/// Parse `identifier` and compute requirements in one step.
pub fn compute_requirements_for(project: &ProjectDescriptor, identifier: &str) -> CalcResult<RequirementSet> {
    let standard: Standard = identifier.parse()?;
    compute_requirements(project, standard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{SoilType, StructureType};
    use crate::requirements::ElementCategory;
    use proptest::prelude::*;

    fn scenario() -> ProjectDescriptor {
        ProjectDescriptor::new("Scenario", 35.0, 5000.0, 4, 300.0)
    }

    #[test]
    fn test_standard_parsing() {
        assert_eq!("UL 96A".parse::<Standard>().unwrap(), Standard::Ul96a);
        assert_eq!("ul96a".parse::<Standard>().unwrap(), Standard::Ul96a);
        assert_eq!("NFPA 780".parse::<Standard>().unwrap(), Standard::Nfpa780);
        assert_eq!("nfpa-780".parse::<Standard>().unwrap(), Standard::Nfpa780);
    }

    #[test]
    fn test_unknown_standard_is_error() {
        let err = "IEC 62305".parse::<Standard>().unwrap_err();
        assert_eq!(err, CalcError::unknown_standard("IEC 62305"));

        let err = compute_requirements_for(&scenario(), "").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_STANDARD");
    }

    #[test]
    fn test_standard_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Standard::Nfpa780).unwrap(), "\"NFPA 780\"");
        let s: Standard = serde_json::from_str("\"UL 96A\"").unwrap();
        assert_eq!(s, Standard::Ul96a);
    }

    #[test]
    fn test_scenario_a_ul96a() {
        let reqs = compute_requirements_for(&scenario(), "UL 96A").unwrap();
        // 4 corners + floor((300 - 8) / 20) edges + (floor(5000 / 500) - 4) field
        assert_eq!(reqs.air_terminal_total(), 4 + 14 + 6);
        assert_eq!(reqs.down_conductors(), 2);
        assert!(!reqs.contains(ElementCategory::BondingConnection));
    }

    #[test]
    fn test_scenario_b_nfpa780_is_more_lenient() {
        let a = compute_requirements_for(&scenario(), "UL 96A").unwrap();
        let b = compute_requirements_for(&scenario(), "NFPA 780").unwrap();
        // 4 corners + floor(292 / 25) edges + (floor(5000 / 600) - 4) field
        assert_eq!(b.air_terminal_total(), 4 + 11 + 4);
        assert!(b.air_terminal_total() < a.air_terminal_total());
    }

    #[test]
    fn test_scenario_d_invalid_area_fails_before_rules() {
        let mut project = scenario();
        project.roof_area_sqft = -1.0;
        for standard in Standard::ALL {
            let err = compute_requirements(&project, standard).unwrap_err();
            assert!(err.is_validation_error());
        }
    }

    #[test]
    fn test_project_not_mutated() {
        let project = scenario().with_soil(SoilType::Rocky);
        let before = project.clone();
        let _ = compute_requirements(&project, Standard::Nfpa780).unwrap();
        assert_eq!(project, before);
    }

    fn any_project() -> impl Strategy<Value = ProjectDescriptor> {
        (
            1.0f64..400.0,
            1.0f64..200_000.0,
            0u32..40,
            1.0f64..4000.0,
            proptest::option::of(0u32..20),
            prop_oneof![
                Just(StructureType::Normal),
                Just(StructureType::Tall),
                Just(StructureType::Complex)
            ],
            prop_oneof![
                Just(SoilType::Normal),
                Just(SoilType::Rocky),
                Just(SoilType::Sandy),
                Just(SoilType::Clay)
            ],
            any::<bool>(),
            0u32..10,
        )
            .prop_map(|(h, area, corners, perimeter, downleads, structure, soil, metal_roof, objects)| {
                let mut project = ProjectDescriptor::new("Prop", h, area, corners, perimeter)
                    .with_structure(structure)
                    .with_soil(soil)
                    .with_metal_roof(metal_roof)
                    .with_metal_objects(objects);
                project.num_downleads = downleads;
                project
            })
    }

    proptest! {
        #[test]
        fn prop_deterministic(project in any_project()) {
            for standard in Standard::ALL {
                let first = compute_requirements(&project, standard).unwrap();
                let second = compute_requirements(&project, standard).unwrap();
                prop_assert_eq!(
                    serde_json::to_string(&first).unwrap(),
                    serde_json::to_string(&second).unwrap()
                );
            }
        }

        #[test]
        fn prop_ul96a_never_fewer_terminals(project in any_project()) {
            let a = compute_requirements(&project, Standard::Ul96a).unwrap();
            let b = compute_requirements(&project, Standard::Nfpa780).unwrap();
            prop_assert!(a.air_terminal_total() >= b.air_terminal_total());
        }

        #[test]
        fn prop_at_least_two_down_conductors(project in any_project()) {
            for standard in Standard::ALL {
                let reqs = compute_requirements(&project, standard).unwrap();
                prop_assert!(reqs.down_conductors() >= MIN_DOWN_CONDUCTORS);
                prop_assert!(reqs.iter().all(|r| r.quantity >= 0.0));
            }
        }
    }
}
