//! UL 96A constant table.
//!
//! Tighter edge spacing than NFPA 780 and no bonding or ground ring
//! categories. Ground rods go at least 10 ft deep.

use super::{Standard, StandardRules};

pub const UL_96A: StandardRules = StandardRules {
    standard: Standard::Ul96a,
    max_spacing_ft: 20.0,
    field_spacing_area_sqft: 500.0,
    ground_rod_depth_ft: 10.0,
    ground_ring_threshold_sqft: None,
    requires_bonding: false,
    bonding_wire_awg: 6,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::ComplianceRules;
    use crate::project::ProjectDescriptor;
    use crate::requirements::{ElementCategory, RequirementDetail};

    #[test]
    fn test_no_bonding_even_with_metal_roof() {
        let project = ProjectDescriptor::new("Metal Shed", 20.0, 3000.0, 4, 220.0)
            .with_metal_roof(true)
            .with_metal_objects(5);
        let reqs = UL_96A.compute_requirements(&project).unwrap();
        assert!(!reqs.contains(ElementCategory::BondingConnection));
    }

    #[test]
    fn test_no_ground_ring_on_large_roof() {
        let project = ProjectDescriptor::new("Distribution Center", 40.0, 250_000.0, 4, 2000.0);
        let reqs = UL_96A.compute_requirements(&project).unwrap();
        assert!(!reqs.ground_ring_required());
        match &reqs.get(ElementCategory::GroundRod).unwrap().detail {
            RequirementDetail::GroundRods { rod_depth_ft, .. } => assert_eq!(*rod_depth_ft, 10.0),
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_notes_name_the_standard() {
        let project = ProjectDescriptor::new("Office", 35.0, 5000.0, 4, 300.0);
        let reqs = UL_96A.compute_requirements(&project).unwrap();
        assert!(reqs.iter().filter(|r| r.category != ElementCategory::ClampFitting).all(|r| r.note.starts_with("UL 96A")));
    }
}
