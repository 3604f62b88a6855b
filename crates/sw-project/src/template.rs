//! Built-in ten-area scenario.

use crate::schema::{
    AdjacencyDef, AreaDef, InitialDef, LATEST_VERSION, Scenario, SolverDef, TimeDef,
};

const AREAS: [(&str, f64, f64, f64); 10] = [
    ("Hokkaido", 0.1, 141.35, 43.06),
    ("Tohoku", 0.1, 140.89, 39.70),
    ("Tokyo", 0.1, 139.75, 35.68),
    ("Hokuriku", 0.1, 137.02, 37.15),
    ("Chubu", 0.1, 136.90, 35.18),
    ("Kansai", 0.1, 135.50, 34.70),
    ("Chugoku", 0.1, 133.94, 34.39),
    ("Shikoku", 0.1, 134.05, 33.56),
    ("Kyushu", 0.1, 130.41, 33.59),
    ("Okinawa", 0.0, 127.68, 26.21),
];

/// Ten areas of 20 identical generators on the built-in adjacency.
pub fn japan_ten_area() -> Scenario {
    let areas = AREAS
        .iter()
        .map(|&(name, coeff, lon, lat)| AreaDef {
            name: name.to_string(),
            generator_count: 20,
            p_m: 0.95,
            b: 1.0,
            b_int: 100.0,
            epsilon: 0.1,
            connection_coeff: Some(coeff),
            lon: Some(lon),
            lat: Some(lat),
        })
        .collect();

    Scenario {
        version: LATEST_VERSION,
        name: "japan-ten-area".to_string(),
        areas,
        adjacency: AdjacencyDef::JapanTenArea,
        selection: Vec::new(),
        disturbances: Vec::new(),
        initial: InitialDef::default(),
        time: TimeDef::default(),
        solver: SolverDef::default(),
    }
}
