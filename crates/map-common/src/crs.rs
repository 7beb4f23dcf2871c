//! Coordinate Reference System codes and their WKT definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CRS codes the provider can georeference into and warp between.
///
/// Coordinates are always handled in x/y order (longitude/easting first),
/// whatever the authority axis order of the CRS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CrsCode {
    /// WGS84 Geographic (degrees)
    Epsg4326,
    /// OGC CRS84: WGS84 with explicit lon/lat order
    Crs84,
    /// Web Mercator (meters)
    Epsg3857,
}

const WKT_4326: &str = concat!(
    r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,"#,
    r#"AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,"#,
    r#"AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,"#,
    r#"AUTHORITY["EPSG","9122"]],AXIS["Latitude",NORTH],AXIS["Longitude",EAST],"#,
    r#"AUTHORITY["EPSG","4326"]]"#
);

const WKT_CRS84: &str = concat!(
    r#"GEOGCS["WGS 84 (CRS84)",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,"#,
    r#"AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,"#,
    r#"AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,"#,
    r#"AUTHORITY["EPSG","9122"]],AXIS["Longitude",EAST],AXIS["Latitude",NORTH],"#,
    r#"AUTHORITY["OGC","CRS84"]]"#
);

const WKT_3857: &str = concat!(
    r#"PROJCS["WGS 84 / Pseudo-Mercator",GEOGCS["WGS 84",DATUM["WGS_1984","#,
    r#"SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],"#,
    r#"AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],"#,
    r#"UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],"#,
    r#"AUTHORITY["EPSG","4326"]],PROJECTION["Mercator_1SP"],"#,
    r#"PARAMETER["central_meridian",0],PARAMETER["scale_factor",1],"#,
    r#"PARAMETER["false_easting",0],PARAMETER["false_northing",0],"#,
    r#"UNIT["metre",1,AUTHORITY["EPSG","9001"]],AXIS["Easting",EAST],"#,
    r#"AXIS["Northing",NORTH],EXTENSION["PROJ4","+proj=merc +a=6378137 +b=6378137 "#,
    r#"+lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +nadgrids=@null +wktext +no_defs"],"#,
    r#"AUTHORITY["EPSG","3857"]]"#
);

impl CrsCode {
    /// Parse a CRS identifier.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326", "epsg:3857", "EPSG:900913"
    /// - "CRS84", "CRS:84", "OGC:CRS84"
    /// - "http://www.opengis.net/def/crs/EPSG/0/4326"
    /// - "http://www.opengis.net/def/crs/OGC/1.3/CRS84"
    /// - "urn:ogc:def:crs:EPSG::3857"
    pub fn parse(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        let code = normalized
            .strip_prefix("HTTP://WWW.OPENGIS.NET/DEF/CRS/EPSG/0/")
            .map(|n| format!("EPSG:{}", n))
            .or_else(|| {
                normalized
                    .strip_prefix("URN:OGC:DEF:CRS:EPSG::")
                    .map(|n| format!("EPSG:{}", n))
            })
            .unwrap_or_else(|| normalized.clone());

        match code.as_str() {
            "EPSG:4326" => Ok(CrsCode::Epsg4326),
            "CRS84"
            | "CRS:84"
            | "OGC:CRS84"
            | "HTTP://WWW.OPENGIS.NET/DEF/CRS/OGC/1.3/CRS84"
            | "URN:OGC:DEF:CRS:OGC:1.3:CRS84" => Ok(CrsCode::Crs84),
            "EPSG:3857" | "EPSG:900913" => Ok(CrsCode::Epsg3857),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// Numeric EPSG code, if the CRS has one.
    pub fn epsg(&self) -> Option<u32> {
        match self {
            CrsCode::Epsg4326 => Some(4326),
            CrsCode::Crs84 => None,
            CrsCode::Epsg3857 => Some(3857),
        }
    }

    /// Check if this is a geographic (lon/lat) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326 | CrsCode::Crs84)
    }

    /// Well-known text definition.
    pub fn wkt(&self) -> &'static str {
        match self {
            CrsCode::Epsg4326 => WKT_4326,
            CrsCode::Crs84 => WKT_CRS84,
            CrsCode::Epsg3857 => WKT_3857,
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Crs84 => "CRS84",
            CrsCode::Epsg3857 => "EPSG:3857",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for CrsCode {
    type Err = CrsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CrsCode {
    type Error = CrsParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<CrsCode> for String {
    fn from(code: CrsCode) -> Self {
        code.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
