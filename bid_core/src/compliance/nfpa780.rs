//! NFPA 780 constant table.
//!
//! Allows 25 ft edge spacing and 600 sqft of field per terminal. Adds a
//! bonding requirement for metal roofs and rooftop metal bodies, and flags a
//! ground ring on large roofs. NFPA 780 sets no hard rod depth; the UL 96A
//! depth is applied unless a ground ring is installed.

use super::{Standard, StandardRules};

pub const NFPA_780: StandardRules = StandardRules {
    standard: Standard::Nfpa780,
    max_spacing_ft: 25.0,
    field_spacing_area_sqft: 600.0,
    ground_rod_depth_ft: 10.0,
    ground_ring_threshold_sqft: Some(10_000.0),
    requires_bonding: true,
    bonding_wire_awg: 6,
};
