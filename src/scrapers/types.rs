use crate::models::GeoBounds;
use serde::{Deserialize, Serialize};

/// Upper bound the vendor UI sends when a price/area filter is unset
pub const UNBOUNDED: &str = "900000000";

/// Filter parameters for the complex marker search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerFilter {
    /// Administrative region code (cortarNo)
    pub cortar_no: String,
    /// Map zoom level the query pretends to be at
    pub zoom: u8,
    /// Colon-joined property kinds, e.g. `APT:ABYG:JGC:PRE`
    pub real_estate_type: String,
    /// RETAIL (sale), RENT (jeonse) or MONTHLY
    pub price_type: String,
}

impl Default for MarkerFilter {
    fn default() -> Self {
        Self {
            cortar_no: "4113510300".to_string(),
            zoom: 16,
            real_estate_type: "APT:ABYG:JGC:PRE".to_string(),
            price_type: "RETAIL".to_string(),
        }
    }
}

impl MarkerFilter {
    /// Full query for `/api/complexes/single-markers/2.0`, in the order the web app sends it
    pub fn query(&self, bounds: &GeoBounds) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("cortarNo", self.cortar_no.clone()),
            ("zoom", self.zoom.to_string()),
            ("priceType", self.price_type.clone()),
            ("markerId", String::new()),
            ("markerType", String::new()),
            ("selectedComplexNo", String::new()),
            ("selectedComplexBuildingNo", String::new()),
            ("fakeComplexMarker", String::new()),
            ("realEstateType", self.real_estate_type.clone()),
            ("tradeType", String::new()),
            ("tag", ":::::::".to_string()),
            ("rentPriceMin", "0".to_string()),
            ("rentPriceMax", UNBOUNDED.to_string()),
            ("priceMin", "0".to_string()),
            ("priceMax", UNBOUNDED.to_string()),
            ("areaMin", "0".to_string()),
            ("areaMax", UNBOUNDED.to_string()),
            ("oldBuildYears", String::new()),
            ("recentlyBuildYears", String::new()),
            ("minHouseHoldCount", String::new()),
            ("maxHouseHoldCount", String::new()),
            ("showArticle", "false".to_string()),
            ("sameAddressGroup", "false".to_string()),
            ("minMaintenanceCost", String::new()),
            ("maxMaintenanceCost", String::new()),
            ("directions", String::new()),
        ];
        query.extend(bounds.query_pairs());
        query.push(("isPresale", "true".to_string()));
        query
    }
}

/// Query for `/api/articles/complex/{complexNo}`
pub fn article_query(complex_no: &str, trade_type: &str) -> Vec<(&'static str, String)> {
    vec![
        ("complexNo", complex_no.to_string()),
        ("tradeType", trade_type.to_string()),
        ("order", "date".to_string()),
        ("showArticle", "true".to_string()),
    ]
}

/// Query for `/api/developmentplan/{planType}/list`
pub fn plan_query(zoom: u8, bounds: &GeoBounds) -> Vec<(&'static str, String)> {
    let mut query = vec![("zoom", zoom.to_string())];
    query.extend(bounds.query_pairs());
    query
}
