//! Sample data used by `lightningbid demo` and `lightningbid new-job`.

use bid_core::{ElementCategory, Material, PriceItem, ProjectDescriptor};

pub fn sample_project() -> ProjectDescriptor {
    ProjectDescriptor::new("Sample Office Building - Lightning Protection", 35.0, 5000.0, 4, 280.0)
        .with_downleads(2)
        .with_material(Material::Copper)
}

pub fn sample_catalog() -> Vec<PriceItem> {
    vec![
        PriceItem::new("AT-001", "Air Terminal - Copper", "ea", 45.00, 15.00).with_material(Material::Copper),
        PriceItem::new("AT-002", "Air Terminal - Aluminum", "ea", 28.00, 15.00).with_material(Material::Aluminum),
        PriceItem::new("COND-100", "Conductor Cable - Copper 4/0 AWG", "ft", 3.50, 2.00)
            .with_material(Material::Copper),
        PriceItem::new("COND-200", "Conductor Cable - Aluminum 2/0", "ft", 1.90, 2.00)
            .with_material(Material::Aluminum),
        PriceItem::new("GR-10", "Ground Rod - 10ft Copper", "ea", 65.00, 50.00),
        PriceItem::new("CLAMP-01", "Cable Clamp", "ea", 8.00, 5.00),
        PriceItem::new("BOND-6", "Bonding Wire #6 AWG", "ft", 2.00, 1.50)
            .with_category(ElementCategory::BondingConnection)
            .with_material(Material::Copper),
    ]
}
