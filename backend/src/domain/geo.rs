//! Geographic points and great-circle distance.

use std::fmt;

/// Mean Earth radius used for distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Validation errors for [`GeoPoint`] construction.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeoPointValidationError {
    /// A coordinate was NaN or infinite.
    #[error("coordinates must be finite numbers")]
    NonFinite,
    /// Longitude outside `[-180, 180]`.
    #[error("longitude {0} must be within [-180, 180]")]
    LongitudeOutOfRange(f64),
    /// Latitude outside `[-90, 90]`.
    #[error("latitude {0} must be within [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// A validated point in decimal degrees.
///
/// # Examples
/// ```
/// use medcycle::domain::GeoPoint;
///
/// let bengaluru = GeoPoint::new(77.5946, 12.9716).expect("valid point");
/// assert_eq!(bengaluru.distance_km(&bengaluru), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Build a point from longitude and latitude.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoPointValidationError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(GeoPointValidationError::NonFinite);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoPointValidationError::LongitudeOutOfRange(longitude));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoPointValidationError::LatitudeOutOfRange(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(*self, *other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two points, in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `h` marginally outside [0, 1] for coincident or
    // antipodal points.
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Errors raised while parsing a `"<lat>,<lon>"` location string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationParseError {
    /// The string did not contain exactly two comma-separated parts.
    #[error("location must be formatted as \"<lat>,<lon>\"")]
    Malformed,
    /// A part was not a number.
    #[error("location component {0:?} is not a number")]
    NotANumber(String),
    /// The numbers did not form a valid point.
    #[error(transparent)]
    Invalid(#[from] GeoPointValidationError),
}

/// Parse a `"<lat>,<lon>"` string as sent by browsers' geolocation helpers.
pub fn parse_lat_lon(raw: &str) -> Result<GeoPoint, LocationParseError> {
    let mut parts = raw.split(',');
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(LocationParseError::Malformed);
    };
    let latitude = parse_component(lat)?;
    let longitude = parse_component(lon)?;
    Ok(GeoPoint::new(longitude, latitude)?)
}

fn parse_component(raw: &str) -> Result<f64, LocationParseError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| LocationParseError::NotANumber(trimmed.to_owned()))
}
