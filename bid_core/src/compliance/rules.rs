//! Placement and sizing rules shared by every standard.
//!
//! Each function takes the standard's constant table and a validated project.
//! Divisions that produce a count of physical parts always round down: the
//! result is the auditable minimum, not a padded estimate. A count that
//! would exceed [`MAX_ELEMENT_COUNT`] is an `InvalidInput` error naming the
//! field that drove it; counts are never clamped.

use tracing::debug;

use super::{
    StandardRules, BONDING_WIRE_PER_CONNECTION_FT, CONDUCTOR_SERVICE_MARGIN, CONDUCTOR_SUPPORT_SPACING_FT,
    CORNER_ALLOWANCE_FT, METAL_ROOF_BONDING_CONNECTIONS, MIN_DOWN_CONDUCTORS,
};
use crate::errors::{CalcError, CalcResult};
use crate::project::{ProjectDescriptor, MAX_ELEMENT_COUNT};
use crate::requirements::{ElementCategory, Requirement, RequirementDetail, RequirementSet};

/// Air terminal counts by placement zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirTerminalCount {
    pub corners: u32,
    pub edges: u32,
    pub field: u32,
    pub max_spacing_ft: f64,
}

impl AirTerminalCount {
    pub fn total(&self) -> u64 {
        u64::from(self.corners) + u64::from(self.edges) + u64::from(self.field)
    }
}

/// Conductor footage breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConductorRun {
    pub down_conductors: u32,
    pub perimeter_run_ft: f64,
    pub vertical_run_ft: f64,
    pub service_margin_ft: f64,
}

impl ConductorRun {
    pub fn total_ft(&self) -> f64 {
        self.perimeter_run_ft + self.vertical_run_ft + self.service_margin_ft
    }
}

/// Edge spacing after the structure type cap.
pub fn effective_spacing_ft(rules: &StandardRules, project: &ProjectDescriptor) -> f64 {
    match project.structure_type.spacing_cap_ft() {
        Some(cap) => rules.max_spacing_ft.min(cap),
        None => rules.max_spacing_ft,
    }
}

pub fn air_terminals(rules: &StandardRules, project: &ProjectDescriptor) -> CalcResult<AirTerminalCount> {
    let corners = project.num_corners;
    check_count("num_corners", f64::from(corners))?;
    let spacing = effective_spacing_ft(rules, project);

    let edge_run = project.perimeter_ft - CORNER_ALLOWANCE_FT * f64::from(corners);
    let edges = floor_count("perimeter_ft", edge_run / spacing)?;

    let field_slots = floor_count("roof_area_sqft", project.roof_area_sqft / rules.field_spacing_area_sqft)?;
    let field = field_slots.saturating_sub(corners);

    Ok(AirTerminalCount {
        corners,
        edges,
        field,
        max_spacing_ft: spacing,
    })
}

/// Down conductor count; an override can raise it but never drop below two.
pub fn down_conductors(project: &ProjectDescriptor) -> u32 {
    MIN_DOWN_CONDUCTORS.max(project.num_downleads.unwrap_or(0))
}

pub fn conductor_run(project: &ProjectDescriptor) -> ConductorRun {
    let down_conductors = down_conductors(project);
    let perimeter_run_ft = project.perimeter_ft;
    let vertical_run_ft = project.building_height_ft * f64::from(down_conductors);
    let service_margin_ft = (perimeter_run_ft + vertical_run_ft) * CONDUCTOR_SERVICE_MARGIN;
    ConductorRun {
        down_conductors,
        perimeter_run_ft,
        vertical_run_ft,
        service_margin_ft,
    }
}

/// Conductor supports needed along `conductor_ft`.
pub fn conductor_supports(conductor_ft: f64) -> CalcResult<u32> {
    floor_count("perimeter_ft", conductor_ft / CONDUCTOR_SUPPORT_SPACING_FT)
}

/// Ground rods: one per down conductor, scaled up for poor soil.
pub fn ground_rods(project: &ProjectDescriptor, down_conductors: u32) -> CalcResult<u32> {
    let rods = (f64::from(down_conductors) * project.soil_type.rods_per_downlead()).ceil();
    check_count("num_downleads", rods)?;
    Ok(rods as u32)
}

pub fn ground_ring_required(rules: &StandardRules, project: &ProjectDescriptor) -> bool {
    rules
        .ground_ring_threshold_sqft
        .is_some_and(|threshold| project.roof_area_sqft > threshold)
}

/// Bonding connections for metal roofs and rooftop metal bodies.
pub fn bonding_connections(project: &ProjectDescriptor) -> CalcResult<u32> {
    let roof = if project.has_metal_roof {
        METAL_ROOF_BONDING_CONNECTIONS
    } else {
        0
    };
    let connections = project.metal_objects.checked_add(roof).unwrap_or(u32::MAX);
    check_count("metal_objects", f64::from(connections))?;
    Ok(connections)
}

/// Build the full requirement set for a validated project.
pub(crate) fn derive(rules: &StandardRules, project: &ProjectDescriptor) -> CalcResult<RequirementSet> {
    let code = rules.standard.code();
    let mut set = RequirementSet::new(rules.standard, project.project_name.clone(), project.preferred_material);

    let terminals = air_terminals(rules, project)?;
    debug!(
        standard = code,
        corners = terminals.corners,
        edges = terminals.edges,
        field = terminals.field,
        "air terminals computed"
    );
    set.insert(Requirement::new(
        ElementCategory::AirTerminal,
        terminals.total() as f64,
        RequirementDetail::AirTerminals {
            corners: terminals.corners,
            edges: terminals.edges,
            field: terminals.field,
            max_spacing_ft: terminals.max_spacing_ft,
            field_area_sqft: rules.field_spacing_area_sqft,
        },
        format!(
            "{}: max {} ft edge spacing, {} sqft per field terminal",
            code, terminals.max_spacing_ft, rules.field_spacing_area_sqft
        ),
    ));

    let run = conductor_run(project);
    let conductor_ft = run.total_ft();
    debug!(standard = code, down_conductors = run.down_conductors, conductor_ft, "conductor run computed");
    set.insert(Requirement::new(
        ElementCategory::Conductor,
        conductor_ft,
        RequirementDetail::Conductors {
            down_conductors: run.down_conductors,
            perimeter_run_ft: run.perimeter_run_ft,
            vertical_run_ft: run.vertical_run_ft,
            service_margin_ft: run.service_margin_ft,
        },
        format!("{}: min {} down conductors (two-way path to ground)", code, MIN_DOWN_CONDUCTORS),
    ));

    let supports = conductor_supports(conductor_ft)?;
    if supports > 0 {
        set.insert(Requirement::new(
            ElementCategory::ClampFitting,
            f64::from(supports),
            RequirementDetail::Fittings {
                support_spacing_ft: CONDUCTOR_SUPPORT_SPACING_FT,
            },
            format!("Conductor supports every {} ft", CONDUCTOR_SUPPORT_SPACING_FT),
        ));
    }

    let rods = ground_rods(project, run.down_conductors)?;
    let ring = ground_ring_required(rules, project);
    let mut rod_note = format!(
        "{}: {} ft min rod depth, one per down conductor minimum",
        code, rules.ground_rod_depth_ft
    );
    if ring {
        rod_note.push_str(", ground ring recommended");
    }
    set.insert(Requirement::new(
        ElementCategory::GroundRod,
        f64::from(rods),
        RequirementDetail::GroundRods {
            rod_depth_ft: rules.ground_rod_depth_ft,
            ground_ring: ring,
            ground_ring_length_ft: ring.then_some(project.perimeter_ft),
        },
        rod_note,
    ));

    if rules.requires_bonding {
        let connections = bonding_connections(project)?;
        if connections > 0 {
            set.insert(Requirement::new(
                ElementCategory::BondingConnection,
                f64::from(connections) * BONDING_WIRE_PER_CONNECTION_FT,
                RequirementDetail::Bonding {
                    connections,
                    wire_size_awg: rules.bonding_wire_awg,
                },
                format!("{}: bond all metal within 6 ft of the system", code),
            ));
        }
    }

    Ok(set)
}

/// Whole parts in `value`, rounded down. Zero for non-positive input.
fn floor_count(field: &str, value: f64) -> CalcResult<u32> {
    if value.is_nan() || value <= 0.0 {
        return Ok(0);
    }
    let count = value.floor();
    check_count(field, count)?;
    Ok(count as u32)
}

fn check_count(field: &str, count: f64) -> CalcResult<()> {
    if count > f64::from(MAX_ELEMENT_COUNT) {
        return Err(CalcError::invalid_input(
            field,
            count.to_string(),
            format!("Derived count exceeds the limit of {}", MAX_ELEMENT_COUNT),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{NFPA_780, UL_96A};
    use crate::project::{SoilType, StructureType};

    fn building() -> ProjectDescriptor {
        ProjectDescriptor::new("Rules", 35.0, 5000.0, 4, 300.0)
    }

    #[test]
    fn test_edges_subtract_corner_allowance() {
        // 300 - 4 * 2 = 292 ft of edge; 292 / 20 = 14.6 -> 14
        assert_eq!(air_terminals(&UL_96A, &building()).unwrap().edges, 14);
    }

    #[test]
    fn test_edges_never_negative() {
        let tiny = ProjectDescriptor::new("Kiosk", 10.0, 20.0, 8, 10.0);
        let count = air_terminals(&UL_96A, &tiny).unwrap();
        assert_eq!(count.edges, 0);
        assert_eq!(count.field, 0);
        assert_eq!(count.total(), 8);
    }

    #[test]
    fn test_huge_perimeter_is_error_not_clamped() {
        let mut project = building();
        project.perimeter_ft = 1.0e12;
        assert!(project.validate().is_ok());

        let err = air_terminals(&UL_96A, &project).unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(err.field(), Some("perimeter_ft"));

        let err = crate::compliance::compute_requirements(&project, crate::compliance::Standard::Ul96a).unwrap_err();
        assert_eq!(err.field(), Some("perimeter_ft"));
    }

    #[test]
    fn test_huge_roof_area_is_error() {
        let mut project = building();
        project.roof_area_sqft = 1.0e15;
        assert_eq!(air_terminals(&NFPA_780, &project).unwrap_err().field(), Some("roof_area_sqft"));
    }

    #[test]
    fn test_count_at_limit_still_computes() {
        // 1_000_000 edge slots at 20 ft spacing, no corners
        let project = ProjectDescriptor::new("Long wall", 10.0, 100.0, 0, 20_000_000.0);
        assert_eq!(air_terminals(&UL_96A, &project).unwrap().edges, MAX_ELEMENT_COUNT);
    }

    #[test]
    fn test_total_does_not_overflow() {
        let count = AirTerminalCount {
            corners: u32::MAX,
            edges: u32::MAX,
            field: u32::MAX,
            max_spacing_ft: 20.0,
        };
        assert_eq!(count.total(), 3 * u64::from(u32::MAX));
    }

    #[test]
    fn test_structure_caps_spacing() {
        let complex = building().with_structure(StructureType::Complex);
        assert_eq!(effective_spacing_ft(&NFPA_780, &complex), 15.0);
        assert_eq!(effective_spacing_ft(&UL_96A, &complex), 15.0);

        let tall = building().with_structure(StructureType::Tall);
        assert_eq!(effective_spacing_ft(&NFPA_780, &tall), 20.0);
        assert_eq!(air_terminals(&NFPA_780, &tall).unwrap().edges, 14);
    }

    #[test]
    fn test_down_conductor_override() {
        assert_eq!(down_conductors(&building()), 2);
        assert_eq!(down_conductors(&building().with_downleads(0)), 2);
        assert_eq!(down_conductors(&building().with_downleads(1)), 2);
        assert_eq!(down_conductors(&building().with_downleads(6)), 6);
    }

    #[test]
    fn test_conductor_length_includes_margin() {
        let run = conductor_run(&building());
        // (300 + 35 * 2) * 1.10
        assert!((run.total_ft() - 407.0).abs() < 1e-9);
        assert!((run.service_margin_ft - 37.0).abs() < 1e-9);
    }

    #[test]
    fn test_supports_floor() {
        assert_eq!(conductor_supports(407.0).unwrap(), 135);
        assert_eq!(conductor_supports(2.9).unwrap(), 0);
        assert!(conductor_supports(1.0e10).is_err());
    }

    #[test]
    fn test_ground_rods_by_soil() {
        assert_eq!(ground_rods(&building(), 2).unwrap(), 2);
        assert_eq!(ground_rods(&building().with_soil(SoilType::Rocky), 2).unwrap(), 4);
        assert_eq!(ground_rods(&building().with_soil(SoilType::Sandy), 3).unwrap(), 5);
        assert_eq!(ground_rods(&building().with_soil(SoilType::Clay), 3).unwrap(), 3);
    }

    #[test]
    fn test_rocky_soil_with_huge_override_is_error() {
        let project = building().with_soil(SoilType::Rocky);
        let err = ground_rods(&project, u32::MAX).unwrap_err();
        assert_eq!(err.field(), Some("num_downleads"));
        assert_eq!(ground_rods(&project, MAX_ELEMENT_COUNT / 2).unwrap(), MAX_ELEMENT_COUNT);
    }

    #[test]
    fn test_bonding_connections() {
        assert_eq!(bonding_connections(&building()).unwrap(), 0);
        assert_eq!(bonding_connections(&building().with_metal_roof(true)).unwrap(), 4);
        assert_eq!(bonding_connections(&building().with_metal_roof(true).with_metal_objects(3)).unwrap(), 7);
    }

    #[test]
    fn test_bonding_overflow_is_error() {
        let project = building().with_metal_roof(true).with_metal_objects(u32::MAX);
        let err = bonding_connections(&project).unwrap_err();
        assert_eq!(err.field(), Some("metal_objects"));

        let err = crate::compliance::compute_requirements(&project, crate::compliance::Standard::Nfpa780).unwrap_err();
        assert_eq!(err.field(), Some("metal_objects"));
    }

    #[test]
    fn test_derive_breakdown_sums() {
        let set = derive(&UL_96A, &building()).unwrap();
        let air = set.get(ElementCategory::AirTerminal).unwrap();
        match air.detail {
            RequirementDetail::AirTerminals { corners, edges, field, .. } => {
                assert_eq!(f64::from(corners + edges + field), air.quantity);
            }
            _ => panic!("unexpected detail"),
        }
        assert_eq!(set.quantity(ElementCategory::ClampFitting), 135.0);
        assert_eq!(set.quantity(ElementCategory::GroundRod), 2.0);
    }
}
