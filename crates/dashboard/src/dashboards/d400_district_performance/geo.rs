use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Geographic centre of Karnataka, used when a district has no anchor
pub const STATE_CENTER: LatLon = LatLon::new(15.3173, 75.7139);

static DISTRICT_ANCHORS: Lazy<HashMap<&'static str, LatLon>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("KA01", LatLon::new(16.1747, 75.6947)); // Bagalkot
    m.insert("KA02", LatLon::new(13.1367, 77.5847)); // Bangalore Rural
    m.insert("KA03", LatLon::new(12.9716, 77.5946)); // Bangalore Urban
    m.insert("KA04", LatLon::new(15.8497, 74.4977)); // Belgaum
    m.insert("KA05", LatLon::new(15.1394, 76.9214)); // Bellary
    m.insert("KA06", LatLon::new(17.9129, 77.5199)); // Bidar
    m.insert("KA07", LatLon::new(11.9236, 76.9395)); // Chamarajanagar
    m.insert("KA08", LatLon::new(13.4355, 77.7315)); // Chikkaballapur
    m.insert("KA09", LatLon::new(13.3161, 75.7720)); // Chikkamagaluru
    m.insert("KA10", LatLon::new(14.2251, 76.3980)); // Chitradurga
    m.insert("KA11", LatLon::new(12.8438, 75.2479)); // Dakshina Kannada
    m.insert("KA12", LatLon::new(14.4644, 75.9217)); // Davanagere
    m.insert("KA13", LatLon::new(15.4589, 75.0078)); // Dharwad
    m.insert("KA14", LatLon::new(15.4292, 75.6339)); // Gadag
    m.insert("KA15", LatLon::new(17.3297, 76.8343)); // Gulbarga
    m.insert("KA16", LatLon::new(13.0053, 76.0965)); // Hassan
    m.insert("KA17", LatLon::new(14.7951, 75.3990)); // Haveri
    m.insert("KA18", LatLon::new(12.4244, 75.7382)); // Kodagu
    m.insert("KA19", LatLon::new(13.1370, 78.1294)); // Kolar
    m.insert("KA20", LatLon::new(15.3520, 76.1540)); // Koppal
    m.insert("KA21", LatLon::new(12.5244, 76.8952)); // Mandya
    m.insert("KA22", LatLon::new(12.2958, 76.6394)); // Mysore
    m.insert("KA23", LatLon::new(16.2076, 77.3463)); // Raichur
    m.insert("KA24", LatLon::new(12.7181, 77.2811)); // Ramanagara
    m.insert("KA25", LatLon::new(13.9299, 75.5681)); // Shimoga
    m.insert("KA26", LatLon::new(13.3392, 77.1006)); // Tumkur
    m.insert("KA27", LatLon::new(13.3409, 74.7421)); // Udupi
    m.insert("KA28", LatLon::new(14.5196, 74.6896)); // Uttara Kannada
    m.insert("KA29", LatLon::new(16.8302, 75.7100)); // Vijayapura
    m.insert("KA30", LatLon::new(16.7700, 77.1387)); // Yadgir
    m
});

/// Map anchor of a district; the state centre for unknown ids
pub fn coordinates_for(district_id: &str) -> LatLon {
    DISTRICT_ANCHORS
        .get(district_id)
        .copied()
        .unwrap_or(STATE_CENTER)
}

pub fn has_anchor(district_id: &str) -> bool {
    DISTRICT_ANCHORS.contains_key(district_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_district() {
        assert_eq!(coordinates_for("KA22"), LatLon::new(12.2958, 76.6394));
        assert!(has_anchor("KA01"));
    }

    #[test]
    fn test_unknown_district_falls_back_to_state_center() {
        assert_eq!(coordinates_for("KA99"), STATE_CENTER);
        assert_eq!(coordinates_for(""), STATE_CENTER);
        assert!(!has_anchor("D1"));
    }

    #[test]
    fn test_table_is_exhaustive_for_karnataka() {
        for n in 1..=30 {
            let id = format!("KA{:02}", n);
            assert!(has_anchor(&id), "missing anchor for {id}");
            assert_ne!(coordinates_for(&id), STATE_CENTER);
        }
    }
}
