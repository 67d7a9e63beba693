//! # Project Descriptor
//!
//! Building facts that drive the compliance rules. A [`ProjectDescriptor`] is
//! only ever handed to the rule engine after [`ProjectDescriptor::validate`]
//! succeeds, so the rules can assume positive geometry.
//!
//! Upstream extraction (spec documents, user forms) produces a partial
//! [`ProjectInput`]; converting it reports the first missing required field
//! instead of inventing a value.
//!
//! ## Example
//!
//! ```rust
//! use bid_core::project::{ProjectDescriptor, ProjectInput};
//!
//! let input: ProjectInput = serde_json::from_str(r#"{
//!     "project_name": "Warehouse 7",
//!     "building_height_ft": 35.0,
//!     "roof_area_sqft": 5000.0,
//!     "num_corners": 4,
//!     "perimeter_ft": 300.0
//! }"#).unwrap();
//!
//! let project = ProjectDescriptor::try_from(input).unwrap();
//! assert_eq!(project.down_conductor_override(), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};

/// Largest count, input or derived, that the rules will produce for any one
/// element.
pub const MAX_ELEMENT_COUNT: u32 = 1_000_000;

/// Soil condition at the grounding electrodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    #[default]
    Normal,
    Rocky,
    Sandy,
    Clay,
}

impl SoilType {
    /// Ground rods required per down conductor in this soil.
    pub fn rods_per_downlead(&self) -> f64 {
        match self {
            SoilType::Normal | SoilType::Clay => 1.0,
            SoilType::Sandy => 1.5,
            SoilType::Rocky => 2.0,
        }
    }
}

/// Conductor material family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    #[serde(alias = "Copper", alias = "COPPER")]
    Copper,
    #[serde(alias = "Aluminum", alias = "ALUMINUM", alias = "aluminium", alias = "Aluminium")]
    Aluminum,
}

impl Material {
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Copper => "copper",
            Material::Aluminum => "aluminum",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copper" | "cu" => Ok(Material::Copper),
            "aluminum" | "aluminium" | "al" => Ok(Material::Aluminum),
            _ => Err(CalcError::invalid_input(
                "preferred_material",
                s,
                "Material must be copper or aluminum",
            )),
        }
    }
}

/// Roof geometry class. Tall and complex structures cap air terminal spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    #[default]
    Normal,
    Tall,
    Complex,
}

impl StructureType {
    /// Upper bound on air terminal spacing (ft), if this structure imposes one.
    pub fn spacing_cap_ft(&self) -> Option<f64> {
        match self {
            StructureType::Normal => None,
            StructureType::Tall => Some(20.0),
            StructureType::Complex => Some(15.0),
        }
    }
}

/// Validated building geometry and preferences.
///
/// ## JSON Example
///
/// ```json
/// {
///   "project_name": "Sample Office Building",
///   "building_height_ft": 35.0,
///   "roof_area_sqft": 5000.0,
///   "num_corners": 4,
///   "perimeter_ft": 300.0,
///   "num_downleads": null,
///   "soil_type": "normal",
///   "preferred_material": "copper",
///   "structure_type": "normal",
///   "has_metal_roof": false,
///   "metal_objects": 0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub project_name: String,

    /// Eave or parapet height above grade (ft)
    pub building_height_ft: f64,

    /// Protected roof area (sqft)
    pub roof_area_sqft: f64,

    /// Outside roof corners, one air terminal each
    pub num_corners: u32,

    /// Roof perimeter (ft), the main conductor loop
    pub perimeter_ft: f64,

    /// Explicit down conductor count; can raise but never lower the minimum
    #[serde(default)]
    pub num_downleads: Option<u32>,

    #[serde(default)]
    pub soil_type: SoilType,

    #[serde(default)]
    pub preferred_material: Material,

    #[serde(default)]
    pub structure_type: StructureType,

    /// Metal roof deck or structure requiring bonding
    #[serde(default)]
    pub has_metal_roof: bool,

    /// Rooftop metal bodies (HVAC units, vents, pipes) within bonding distance
    #[serde(default)]
    pub metal_objects: u32,
}

impl ProjectDescriptor {
    /// Create a descriptor with default soil, material and structure.
    pub fn new(
        project_name: impl Into<String>,
        building_height_ft: f64,
        roof_area_sqft: f64,
        num_corners: u32,
        perimeter_ft: f64,
    ) -> Self {
        ProjectDescriptor {
            project_name: project_name.into(),
            building_height_ft,
            roof_area_sqft,
            num_corners,
            perimeter_ft,
            num_downleads: None,
            soil_type: SoilType::default(),
            preferred_material: Material::default(),
            structure_type: StructureType::default(),
            has_metal_roof: false,
            metal_objects: 0,
        }
    }

    pub fn with_downleads(mut self, num_downleads: u32) -> Self {
        self.num_downleads = Some(num_downleads);
        self
    }

    pub fn with_soil(mut self, soil_type: SoilType) -> Self {
        self.soil_type = soil_type;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.preferred_material = material;
        self
    }

    pub fn with_structure(mut self, structure_type: StructureType) -> Self {
        self.structure_type = structure_type;
        self
    }

    pub fn with_metal_roof(mut self, has_metal_roof: bool) -> Self {
        self.has_metal_roof = has_metal_roof;
        self
    }

    pub fn with_metal_objects(mut self, metal_objects: u32) -> Self {
        self.metal_objects = metal_objects;
        self
    }

    pub fn down_conductor_override(&self) -> Option<u32> {
        self.num_downleads
    }

    /// Validate geometry before any rule computation.
    ///
    /// Height, roof area and perimeter must be finite and strictly positive.
    pub fn validate(&self) -> CalcResult<()> {
        if self.project_name.trim().is_empty() {
            return Err(CalcError::invalid_input(
                "project_name",
                self.project_name.clone(),
                "Project name cannot be blank",
            ));
        }
        require_positive("building_height_ft", self.building_height_ft, "Building height must be positive")?;
        require_positive("roof_area_sqft", self.roof_area_sqft, "Roof area must be positive")?;
        require_positive("perimeter_ft", self.perimeter_ft, "Perimeter must be positive")?;
        require_count("num_corners", self.num_corners)?;
        if let Some(downleads) = self.num_downleads {
            require_count("num_downleads", downleads)?;
        }
        require_count("metal_objects", self.metal_objects)?;
        Ok(())
    }
}

fn require_count(field: &str, value: u32) -> CalcResult<()> {
    if value > MAX_ELEMENT_COUNT {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            format!("Count cannot exceed {}", MAX_ELEMENT_COUNT),
        ));
    }
    Ok(())
}

fn require_positive(field: &str, value: f64, reason: &str) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), reason));
    }
    Ok(())
}

/// Partially-resolved project data as produced by upstream extraction.
///
/// Soil type and material fall back to normal/copper; every geometric field
/// must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInput {
    pub project_name: Option<String>,
    pub building_height_ft: Option<f64>,
    pub roof_area_sqft: Option<f64>,
    pub num_corners: Option<u32>,
    pub perimeter_ft: Option<f64>,
    pub num_downleads: Option<u32>,
    pub soil_type: Option<SoilType>,
    pub preferred_material: Option<Material>,
    pub structure_type: Option<StructureType>,
    pub has_metal_roof: Option<bool>,
    pub metal_objects: Option<u32>,
}

impl TryFrom<ProjectInput> for ProjectDescriptor {
    type Error = CalcError;

    fn try_from(input: ProjectInput) -> CalcResult<Self> {
        let project = ProjectDescriptor {
            project_name: input.project_name.ok_or_else(|| CalcError::missing_field("project_name"))?,
            building_height_ft: input
                .building_height_ft
                .ok_or_else(|| CalcError::missing_field("building_height_ft"))?,
            roof_area_sqft: input
                .roof_area_sqft
                .ok_or_else(|| CalcError::missing_field("roof_area_sqft"))?,
            num_corners: input.num_corners.ok_or_else(|| CalcError::missing_field("num_corners"))?,
            perimeter_ft: input.perimeter_ft.ok_or_else(|| CalcError::missing_field("perimeter_ft"))?,
            num_downleads: input.num_downleads,
            soil_type: input.soil_type.unwrap_or_default(),
            preferred_material: input.preferred_material.unwrap_or_default(),
            structure_type: input.structure_type.unwrap_or_default(),
            has_metal_roof: input.has_metal_roof.unwrap_or(false),
            metal_objects: input.metal_objects.unwrap_or(0),
        };
        project.validate()?;
        Ok(project)
    }
}

impl From<&ProjectDescriptor> for ProjectInput {
    fn from(project: &ProjectDescriptor) -> Self {
        ProjectInput {
            project_name: Some(project.project_name.clone()),
            building_height_ft: Some(project.building_height_ft),
            roof_area_sqft: Some(project.roof_area_sqft),
            num_corners: Some(project.num_corners),
            perimeter_ft: Some(project.perimeter_ft),
            num_downleads: project.num_downleads,
            soil_type: Some(project.soil_type),
            preferred_material: Some(project.preferred_material),
            structure_type: Some(project.structure_type),
            has_metal_roof: Some(project.has_metal_roof),
            metal_objects: Some(project.metal_objects),
        }
    }
}
