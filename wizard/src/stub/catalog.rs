use launchcore::mission::{LaunchCoordinates, OrbitType, RocketOption};

/// Launcher known to the stub backend, with the highest altitude it can reach.
pub struct CatalogEntry {
    pub rocket_type: &'static str,
    pub launch_site: &'static str,
    pub coordinates: LaunchCoordinates,
    pub orbit: OrbitType,
    pub max_altitude_km: f64,
}

const fn site(x: f64, y: f64, z: f64) -> LaunchCoordinates {
    LaunchCoordinates { x, y, z }
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        rocket_type: "Falcon 9",
        launch_site: "Cape Canaveral SLC-40",
        coordinates: site(28.56, -80.58, 0.0),
        orbit: OrbitType::Leo,
        max_altitude_km: 2_000.0,
    },
    CatalogEntry {
        rocket_type: "Electron",
        launch_site: "Mahia Peninsula LC-1",
        coordinates: site(-39.26, 177.86, 0.0),
        orbit: OrbitType::Leo,
        max_altitude_km: 1_200.0,
    },
    CatalogEntry {
        rocket_type: "PSLV",
        launch_site: "Satish Dhawan Space Centre",
        coordinates: site(13.72, 80.23, 0.0),
        orbit: OrbitType::Leo,
        max_altitude_km: 1_500.0,
    },
    CatalogEntry {
        rocket_type: "Soyuz-2.1b",
        launch_site: "Baikonur Cosmodrome",
        coordinates: site(45.96, 63.31, 0.0),
        orbit: OrbitType::Meo,
        max_altitude_km: 24_000.0,
    },
    CatalogEntry {
        rocket_type: "Falcon 9",
        launch_site: "Cape Canaveral SLC-40",
        coordinates: site(28.56, -80.58, 0.0),
        orbit: OrbitType::Meo,
        max_altitude_km: 20_200.0,
    },
    CatalogEntry {
        rocket_type: "Ariane 5",
        launch_site: "Guiana Space Centre",
        coordinates: site(5.24, -52.77, 0.0),
        orbit: OrbitType::Geo,
        max_altitude_km: 35_786.0,
    },
    CatalogEntry {
        rocket_type: "Falcon Heavy",
        launch_site: "Kennedy LC-39A",
        coordinates: site(28.61, -80.60, 0.0),
        orbit: OrbitType::Geo,
        max_altitude_km: 35_786.0,
    },
    CatalogEntry {
        rocket_type: "Falcon Heavy",
        launch_site: "Kennedy LC-39A",
        coordinates: site(28.61, -80.60, 0.0),
        orbit: OrbitType::Heo,
        max_altitude_km: 50_000.0,
    },
    CatalogEntry {
        rocket_type: "Proton-M",
        launch_site: "Baikonur Cosmodrome",
        coordinates: site(45.92, 63.34, 0.0),
        orbit: OrbitType::Heo,
        max_altitude_km: 42_000.0,
    },
];

/// Launchers flying `orbit` that reach at least `altitude_km`, in catalogue order.
pub fn eligible(orbit: OrbitType, altitude_km: f64) -> Vec<RocketOption> {
    CATALOG
        .iter()
        .filter(|entry| entry.orbit == orbit && entry.max_altitude_km >= altitude_km)
        .map(|entry| RocketOption {
            rocket_type: entry.rocket_type.to_string(),
            launch_site: entry.launch_site.to_string(),
            launch_site_coordinates: entry.coordinates.to_string(),
        })
        .collect()
}
