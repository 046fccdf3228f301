//! The static override table: canonical places and the aliases that name
//! them.
//!
//! Anchors are city-centre coordinates. A geocode farther than a place's
//! `radius_km` from its anchor is treated as wrong for that place.

use venuemap_core::GeoPoint;

/// Country assigned to every entry in the table.
pub const UNITED_STATES: &str = "United States of America";

/// A canonical place an alias resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Place {
    /// Canonical city, or `None` when the alias names a whole metro area.
    pub city: Option<&'static str>,
    /// Canonical state (or district) name.
    pub state: &'static str,
    /// Canonical country name.
    pub country: &'static str,
    /// Coordinate substituted for a bad geocode.
    pub anchor: GeoPoint,
    /// Tolerance around the anchor within which a geocode is trusted.
    pub radius_km: f64,
}

impl Place {
    const fn named(city: &'static str, state: &'static str, lat: f64, lng: f64, radius_km: f64) -> Self {
        Self {
            city: Some(city),
            state,
            country: UNITED_STATES,
            anchor: GeoPoint::from_static(lat, lng),
            radius_km,
        }
    }

    /// Report whether queries naming this place should require an exact city
    /// match.
    #[must_use]
    pub const fn forces_exact_city(&self) -> bool {
        self.city.is_some()
    }
}

/// One row of the override table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideEntry {
    /// Lower-case match key, compared on word boundaries.
    pub key: &'static str,
    /// Place the key resolves to.
    pub place: &'static Place,
}

const fn alias(key: &'static str, place: &'static Place) -> OverrideEntry {
    OverrideEntry { key, place }
}

const MANHATTAN: Place = Place::named("New York", "New York", 40.7831, -73.9712, 25.0);

/// The five boroughs as a whole; no single city name applies.
const NEW_YORK_CITY: Place = Place {
    city: None,
    state: "New York",
    country: UNITED_STATES,
    anchor: GeoPoint::from_static(40.7128, -74.006),
    radius_km: 50.0,
};

const PHILADELPHIA: Place = Place::named("Philadelphia", "Pennsylvania", 39.9526, -75.1652, 40.0);
const BROOKLYN: Place = Place::named("Brooklyn", "New York", 40.6782, -73.9442, 20.0);
const BOSTON: Place = Place::named("Boston", "Massachusetts", 42.3601, -71.0589, 40.0);
const BALTIMORE: Place = Place::named("Baltimore", "Maryland", 39.2904, -76.6122, 40.0);
const CHICAGO: Place = Place::named("Chicago", "Illinois", 41.8781, -87.6298, 50.0);
const NASHVILLE: Place = Place::named("Nashville", "Tennessee", 36.1627, -86.7816, 40.0);
const MEMPHIS: Place = Place::named("Memphis", "Tennessee", 35.1495, -90.049, 40.0);
pub(crate) const WASHINGTON_DC: Place = Place::named("Washington", "District of Columbia", 38.9072, -77.0369, 40.0);
pub(crate) const LOS_ANGELES: Place = Place::named("Los Angeles", "California", 34.0522, -118.2437, 60.0);
const LAS_VEGAS: Place = Place::named("Las Vegas", "Nevada", 36.1699, -115.1398, 40.0);
const NEW_ORLEANS: Place = Place::named("New Orleans", "Louisiana", 29.9511, -90.0715, 40.0);
const SAN_ANTONIO: Place = Place::named("San Antonio", "Texas", 29.4241, -98.4936, 40.0);
const SAN_DIEGO: Place = Place::named("San Diego", "California", 32.7157, -117.1611, 40.0);
const SAN_JOSE: Place = Place::named("San Jose", "California", 37.3382, -121.8863, 40.0);
const SAN_FRANCISCO: Place = Place::named("San Francisco", "California", 37.7749, -122.4194, 30.0);
const FRESNO: Place = Place::named("Fresno", "California", 36.7378, -119.7871, 40.0);
const SACRAMENTO: Place = Place::named("Sacramento", "California", 38.5816, -121.4944, 40.0);
const OAKLAND: Place = Place::named("Oakland", "California", 37.8044, -122.2712, 30.0);
const LONG_BEACH: Place = Place::named("Long Beach", "California", 33.7701, -118.1937, 30.0);
const BUFFALO: Place = Place::named("Buffalo", "New York", 42.8864, -78.8784, 40.0);
const ROCHESTER: Place = Place::named("Rochester", "New York", 43.1566, -77.6088, 40.0);
const INDIANAPOLIS: Place = Place::named("Indianapolis", "Indiana", 39.7684, -86.1581, 40.0);
const JACKSONVILLE: Place = Place::named("Jacksonville", "Florida", 30.3322, -81.6557, 50.0);
const MIAMI: Place = Place::named("Miami", "Florida", 25.7617, -80.1918, 40.0);
const HOUSTON: Place = Place::named("Houston", "Texas", 29.7604, -95.3698, 60.0);
const AUSTIN: Place = Place::named("Austin", "Texas", 30.2672, -97.7431, 40.0);
const DALLAS: Place = Place::named("Dallas", "Texas", 32.7767, -96.797, 40.0);
const FORT_WORTH: Place = Place::named("Fort Worth", "Texas", 32.7555, -97.3308, 40.0);
const EL_PASO: Place = Place::named("El Paso", "Texas", 31.7619, -106.485, 40.0);
const ATLANTA: Place = Place::named("Atlanta", "Georgia", 33.749, -84.388, 40.0);
const LOUISVILLE: Place = Place::named("Louisville", "Kentucky", 38.2527, -85.7585, 40.0);
const CHARLOTTE: Place = Place::named("Charlotte", "North Carolina", 35.2271, -80.8431, 40.0);
const RALEIGH: Place = Place::named("Raleigh", "North Carolina", 35.7796, -78.6382, 40.0);
const VIRGINIA_BEACH: Place = Place::named("Virginia Beach", "Virginia", 36.8529, -75.978, 40.0);
const MINNEAPOLIS: Place = Place::named("Minneapolis", "Minnesota", 44.9778, -93.265, 40.0);
const SEATTLE: Place = Place::named("Seattle", "Washington", 47.6062, -122.3321, 40.0);
const DENVER: Place = Place::named("Denver", "Colorado", 39.7392, -104.9903, 40.0);
const COLORADO_SPRINGS: Place = Place::named("Colorado Springs", "Colorado", 38.8339, -104.8214, 40.0);
const HARTFORD: Place = Place::named("Hartford", "Connecticut", 41.7658, -72.6734, 40.0);
const KANSAS_CITY: Place = Place::named("Kansas City", "Missouri", 39.0997, -94.5786, 40.0);
const OKLAHOMA_CITY: Place = Place::named("Oklahoma City", "Oklahoma", 35.4676, -97.5164, 40.0);
const TULSA: Place = Place::named("Tulsa", "Oklahoma", 36.154, -95.9928, 40.0);
const DETROIT: Place = Place::named("Detroit", "Michigan", 42.3314, -83.0458, 40.0);
const ALBUQUERQUE: Place = Place::named("Albuquerque", "New Mexico", 35.0844, -106.6504, 40.0);
const MILWAUKEE: Place = Place::named("Milwaukee", "Wisconsin", 43.0389, -87.9065, 40.0);
const WILMINGTON: Place = Place::named("Wilmington", "Delaware", 39.7391, -75.5398, 30.0);
const HARRISBURG: Place = Place::named("Harrisburg", "Pennsylvania", 40.2732, -76.8867, 30.0);
const OMAHA: Place = Place::named("Omaha", "Nebraska", 41.2565, -95.9345, 40.0);
const CLEVELAND: Place = Place::named("Cleveland", "Ohio", 41.4993, -81.6944, 40.0);
const COLUMBUS: Place = Place::named("Columbus", "Ohio", 39.9612, -82.9988, 40.0);
const WICHITA: Place = Place::named("Wichita", "Kansas", 37.6872, -97.3301, 40.0);
const PHOENIX: Place = Place::named("Phoenix", "Arizona", 33.4484, -112.074, 50.0);
const TUCSON: Place = Place::named("Tucson", "Arizona", 32.2226, -110.9747, 40.0);
const MESA: Place = Place::named("Mesa", "Arizona", 33.4152, -111.8315, 30.0);

/// Every alias in match order; the longest matching key wins.
pub const OVERRIDES: &[OverrideEntry] = &[
    alias("manhattan", &MANHATTAN),
    alias("nyc", &NEW_YORK_CITY),
    alias("new york city", &NEW_YORK_CITY),
    alias("newyorkcity", &NEW_YORK_CITY),
    alias("philadelphia", &PHILADELPHIA),
    alias("philly", &PHILADELPHIA),
    alias("phiadelphia", &PHILADELPHIA),
    alias("brooklyn", &BROOKLYN),
    alias("boston", &BOSTON),
    alias("baltimore", &BALTIMORE),
    alias("chicago", &CHICAGO),
    alias("nashville", &NASHVILLE),
    alias("memphis", &MEMPHIS),
    alias("washington dc", &WASHINGTON_DC),
    alias("washington, dc", &WASHINGTON_DC),
    alias("washingtondc", &WASHINGTON_DC),
    alias("district of columbia", &WASHINGTON_DC),
    alias("los angeles", &LOS_ANGELES),
    alias("losangeles", &LOS_ANGELES),
    alias("las vegas", &LAS_VEGAS),
    alias("new orleans", &NEW_ORLEANS),
    alias("neworleans", &NEW_ORLEANS),
    alias("san antonio", &SAN_ANTONIO),
    alias("san diego", &SAN_DIEGO),
    alias("san jose", &SAN_JOSE),
    alias("san francisco", &SAN_FRANCISCO),
    alias("sanfrancisco", &SAN_FRANCISCO),
    alias("fresno", &FRESNO),
    alias("sacramento", &SACRAMENTO),
    alias("oakland", &OAKLAND),
    alias("long beach", &LONG_BEACH),
    alias("longbeach", &LONG_BEACH),
    alias("buffallo", &BUFFALO),
    alias("rochester", &ROCHESTER),
    alias("indianapolis", &INDIANAPOLIS),
    alias("jacksonville", &JACKSONVILLE),
    alias("miami", &MIAMI),
    alias("houston", &HOUSTON),
    alias("austin", &AUSTIN),
    alias("dallas", &DALLAS),
    alias("fort worth", &FORT_WORTH),
    alias("fortworth", &FORT_WORTH),
    alias("el paso", &EL_PASO),
    alias("elpaso", &EL_PASO),
    alias("atlanta", &ATLANTA),
    alias("louisville", &LOUISVILLE),
    alias("charlotte", &CHARLOTTE),
    alias("raleigh", &RALEIGH),
    alias("virginia beach", &VIRGINIA_BEACH),
    alias("virginiabeach", &VIRGINIA_BEACH),
    alias("virginia beah", &VIRGINIA_BEACH),
    alias("minneapolis", &MINNEAPOLIS),
    alias("seattle", &SEATTLE),
    alias("denver", &DENVER),
    alias("colorado springs", &COLORADO_SPRINGS),
    alias("coloradosprings", &COLORADO_SPRINGS),
    alias("hartford", &HARTFORD),
    alias("kansas city", &KANSAS_CITY),
    alias("kansascity", &KANSAS_CITY),
    alias("oklahoma city", &OKLAHOMA_CITY),
    alias("oklahomacity", &OKLAHOMA_CITY),
    alias("tulsa", &TULSA),
    alias("detroit", &DETROIT),
    alias("albuquerque", &ALBUQUERQUE),
    alias("albequerque", &ALBUQUERQUE),
    alias("milwaukee", &MILWAUKEE),
    alias("wilmington", &WILMINGTON),
    alias("harrisburg", &HARRISBURG),
    alias("omaha", &OMAHA),
    alias("cleveland", &CLEVELAND),
    alias("columbus", &COLUMBUS),
    alias("wichita", &WICHITA),
    alias("pheonix", &PHOENIX),
    alias("phoenix", &PHOENIX),
    alias("tucson", &TUCSON),
    alias("mesa", &MESA),
];
