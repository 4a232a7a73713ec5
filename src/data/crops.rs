use crate::shared::*;

/// Populate the CropRegistry with all crop definitions.
///
///   cenoura — quick and cheap, the automation starter crop
///   milho   — slow, thirsty, best margin
///   batata  — middle of the road
pub fn populate_crops(registry: &mut CropRegistry) {
    let crops: Vec<CropDef> = vec![
        CropDef {
            id: "cenoura".into(),
            name: "Cenoura".into(),
            growth_ticks: 8,
            sell_price: 15,
            water_need: 2,
            seed_price: 5,
        },
        CropDef {
            id: "milho".into(),
            name: "Milho".into(),
            growth_ticks: 14,
            sell_price: 35,
            water_need: 4,
            seed_price: 12,
        },
        CropDef {
            id: "batata".into(),
            name: "Batata".into(),
            growth_ticks: 10,
            sell_price: 22,
            water_need: 3,
            seed_price: 8,
        },
    ];

    for crop in crops {
        registry.crops.insert(crop.id.clone(), crop);
    }
}
