pub mod macros;

use chrono::NaiveDate;
use ganadero_core::registry::{BreedRegistry, FeedCatalog};
use ganadero_data::{
    Animal, Breed, BreedRef, DietComposition, FeedCategory, FeedItem, ProductionSystem,
    QualityProfileKind, Sex, TraitLevel, WeightObservation,
};

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(dead_code)]
pub fn retinta() -> Breed {
    Breed {
        id: "retinta".into(),
        name: "Retinta".into(),
        subspecies: "Bos taurus".into(),
        weight_male_adult: Some(950.0.into()),
        weight_female_adult: Some(600.0.into()),
        adg_feedlot: Some(1.2.into()),
        adg_grazing: Some(0.8.into()),
        fcr: Some(6.5.into()),
        slaughter_age_months: Some("18-24".into()),
        heat_tolerance: TraitLevel::High,
        marbling_potential: TraitLevel::Medium,
        calving_ease: TraitLevel::High,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn limousin() -> Breed {
    Breed {
        id: "limousin".into(),
        name: "Limousin".into(),
        subspecies: "Bos taurus".into(),
        weight_male_adult: Some(900.0.into()),
        weight_female_adult: Some(650.0.into()),
        adg_feedlot: Some(1.4.into()),
        adg_grazing: Some(0.9.into()),
        fcr: Some(6.0.into()),
        slaughter_age_months: Some(20.0.into()),
        heat_tolerance: TraitLevel::Medium,
        marbling_potential: TraitLevel::Low,
        calving_ease: TraitLevel::Low,
        dressing_pct: Some(62.0),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn brahman() -> Breed {
    Breed {
        id: "brahman".into(),
        name: "Brahman".into(),
        subspecies: "Bos indicus".into(),
        weight_male_adult: Some("800-1000".into()),
        weight_female_adult: Some(500.0.into()),
        adg_feedlot: Some(1.1.into()),
        adg_grazing: Some(0.7.into()),
        heat_tolerance: TraitLevel::VeryHigh,
        marbling_potential: TraitLevel::Low,
        calving_ease: TraitLevel::High,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn wagyu() -> Breed {
    Breed {
        id: "wagyu".into(),
        name: "Wagyu".into(),
        subspecies: "Bos taurus".into(),
        weight_male_adult: Some(750.0.into()),
        adg_feedlot: Some(0.9.into()),
        adg_grazing: Some(0.6.into()),
        marbling_potential: TraitLevel::VeryHigh,
        quality_profile: Some(QualityProfileKind::Wagyu),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn registry() -> BreedRegistry {
    BreedRegistry::from_breeds(vec![retinta(), limousin(), brahman(), wagyu()])
}

#[allow(dead_code)]
pub fn feed(
    id: &str,
    name: &str,
    category: FeedCategory,
    cp: f64,
    ndf: f64,
    ne: f64,
) -> FeedItem {
    FeedItem {
        id: id.to_string(),
        name: name.to_string(),
        category,
        legume: false,
        dry_matter_pct: 90.0,
        crude_protein_pct: cp,
        ndf_pct: ndf,
        adf_pct: ndf * 0.6,
        fat_pct: 2.5,
        phosphorus_pct: 0.3,
        net_energy_mcal: ne,
        cost_per_kg: 0.25,
    }
}

#[allow(dead_code)]
pub fn catalog() -> FeedCatalog {
    FeedCatalog::from_items(vec![
        feed("heno", "Heno de avena", FeedCategory::Forage, 9.0, 60.0, 1.1),
        feed("paja", "Paja de cebada", FeedCategory::Forage, 4.0, 75.0, 0.8),
        feed("cebada", "Cebada grano", FeedCategory::Concentrate, 11.0, 18.0, 2.0),
        feed("soja", "Harina de soja 44", FeedCategory::ProteinSupplement, 44.0, 12.0, 1.9),
        feed("alfalfa", "Alfalfa fresca", FeedCategory::Forage, 19.0, 40.0, 1.3),
        feed("bellota", "Bellota de encina", FeedCategory::Concentrate, 5.0, 20.0, 2.1),
    ])
}

/// Fluent construction of test animals.
#[allow(dead_code)]
#[derive(Clone)]
pub struct AnimalBuilder {
    animal: Animal,
}

#[allow(dead_code)]
impl AnimalBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            animal: Animal::new(id, Sex::Male, date(2024, 1, 1), BreedRef::registered("retinta"), 40.0),
        }
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.animal.sex = sex;
        self
    }

    pub fn born(mut self, birth: NaiveDate) -> Self {
        self.animal.birth_date = birth;
        self
    }

    pub fn breed(mut self, key: &str) -> Self {
        self.animal.breed = BreedRef::registered(key);
        self
    }

    pub fn cross(mut self, sire: &str, dam: &str) -> Self {
        self.animal.breed = BreedRef::cross(sire, dam);
        self
    }

    pub fn birth_weight(mut self, weight: f64) -> Self {
        self.animal.birth_weight = weight;
        self
    }

    pub fn weighed(mut self, on: NaiveDate, weight: f64) -> Self {
        self.animal.last_weighing = Some(WeightObservation { date: on, weight });
        self
    }

    pub fn system(mut self, system: ProductionSystem) -> Self {
        self.animal.system = system;
        self
    }

    pub fn diet(mut self, diet: DietComposition) -> Self {
        self.animal.diet = Some(diet);
        self
    }

    pub fn finishing_from(mut self, start: NaiveDate) -> Self {
        self.animal.finishing_start = Some(start);
        self
    }

    pub fn montanera(mut self) -> Self {
        self.animal.management.acorn_feeding = true;
        self.animal.management.soy_lecithin = true;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.animal.genetic_seed = Some(seed);
        self
    }

    pub fn build(self) -> Animal {
        self.animal
    }
}
