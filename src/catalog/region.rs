use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{OrchardError, Result};

use super::{Catalog, Category};

/// How a planting region's harvest is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Market,
    Pick,
}

impl AreaType {
    pub fn as_str(self) -> &'static str {
        match self {
            AreaType::Market => "market",
            AreaType::Pick => "pick",
        }
    }
}

impl FromStr for AreaType {
    type Err = OrchardError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "market" => Ok(AreaType::Market),
            "pick" => Ok(AreaType::Pick),
            other => Err(OrchardError::Validation(format!(
                "invalid region area type `{other}`, choose pick or market"
            ))),
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the plantation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "regionId")]
    pub id: u32,
    #[serde(rename = "fruit_type_num")]
    pub category: Category,
    pub variety: String,
    pub area: f64,
    #[serde(rename = "areaType")]
    pub area_type: AreaType,
}

impl Region {
    pub fn new(
        id: u32,
        category: Category,
        variety: impl Into<String>,
        area: f64,
        area_type: AreaType,
    ) -> Self {
        Self {
            id,
            category,
            variety: variety.into(),
            area,
            area_type,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "Region {}: {} {}. Region Type: {}. Area: {}",
            self.id,
            self.variety,
            self.category.name(),
            self.area_type,
            self.area
        )
    }

    fn grows(&self, category: Category, variety: &str) -> bool {
        self.category == category && self.variety == variety
    }
}

/// All planting regions of the orchard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plantation {
    regions: Vec<Region>,
}

impl Plantation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_regions(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn region(&self, id: u32) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }

    /// Adds a region planted with a catalogued fruit under a fresh id.
    pub fn add_region(&mut self, region: Region, catalog: &Catalog) -> Result<()> {
        if catalog.lookup(region.category, &region.variety).is_none() {
            return Err(OrchardError::FruitNotFound {
                category: region.category.number(),
                variety: region.variety,
            });
        }
        if self.region(region.id).is_some() {
            return Err(OrchardError::DuplicateRegion(region.id));
        }
        tracing::info!(region = region.id, variety = %region.variety, "region added");
        self.regions.push(region);
        Ok(())
    }

    pub fn set_area_type(&mut self, id: u32, area_type: AreaType) -> Result<&Region> {
        let region = self
            .regions
            .iter_mut()
            .find(|region| region.id == id)
            .ok_or(OrchardError::RegionNotFound(id))?;
        region.area_type = area_type;
        tracing::info!(region = id, area_type = %area_type, "region area type switched");
        Ok(region)
    }

    /// Total `(pick, market)` area planted with a variety.
    pub fn area_by_variety(&self, category: Category, variety: &str) -> (f64, f64) {
        self.regions
            .iter()
            .filter(|region| region.grows(category, variety))
            .fold((0.0, 0.0), |(pick, market), region| match region.area_type {
                AreaType::Pick => (pick + region.area, market),
                AreaType::Market => (pick, market + region.area),
            })
    }

    /// Region ids split into `(pick, market)` for a variety.
    pub fn region_ids(&self, category: Category, variety: &str) -> (Vec<u32>, Vec<u32>) {
        let mut pick = Vec::new();
        let mut market = Vec::new();
        for region in self.regions.iter().filter(|r| r.grows(category, variety)) {
            match region.area_type {
                AreaType::Pick => pick.push(region.id),
                AreaType::Market => market.push(region.id),
            }
        }
        (pick, market)
    }
}
