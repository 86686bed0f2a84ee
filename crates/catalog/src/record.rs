use serde::Deserialize;

/// Position of a record in its catalog.
///
/// Assigned once when the catalog is built and never reused for another
/// record; every derived structure (group map, index maps, links) refers to
/// records through this and never holds a copy.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordIndex(pub u32);

impl RecordIndex {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for RecordIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supernova identifier (CID). Opaque; numeric CIDs are kept as their
/// decimal text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Equatorial coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RaDec {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl RaDec {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self { ra_deg, dec_deg }
    }
}

/// SDSS photometric band.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Band {
    U,
    G,
    #[default]
    R,
    I,
    Z,
}

impl Band {
    pub const ALL: [Band; 5] = [Band::U, Band::G, Band::R, Band::I, Band::Z];

    pub fn name(self) -> &'static str {
        match self {
            Band::U => "u",
            Band::G => "g",
            Band::R => "r",
            Band::I => "i",
            Band::Z => "z",
        }
    }
}

impl std::str::FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "u" | "U" => Ok(Band::U),
            "g" | "G" => Ok(Band::G),
            "r" | "R" => Ok(Band::R),
            "i" | "I" => Ok(Band::I),
            "z" | "Z" => Ok(Band::Z),
            other => Err(format!("unknown band: {other}")),
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Band magnitudes; each one independently unknown.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Photometry {
    pub u: Option<f64>,
    pub g: Option<f64>,
    pub r: Option<f64>,
    pub i: Option<f64>,
    pub z: Option<f64>,
}

impl Photometry {
    pub fn get(&self, band: Band) -> Option<f64> {
        match band {
            Band::U => self.u,
            Band::G => self.g,
            Band::R => self.r,
            Band::I => self.i,
            Band::Z => self.z,
        }
    }

    /// Magnitudes in `u g r i z` order.
    pub fn in_order(&self) -> [Option<f64>; 5] {
        Band::ALL.map(|b| self.get(b))
    }
}

/// One catalog row: a host-galaxy candidate associated with a supernova.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub index: RecordIndex,
    pub group: Option<GroupId>,
    pub object_id: Option<String>,
    pub position: Option<RaDec>,
    pub separation_arcmin: Option<f64>,
    pub redshift_gal: Option<f64>,
    pub z_cmb: Option<f64>,
    pub photometry: Photometry,
}

impl Record {
    /// Separation usable for ordering: present and finite.
    pub fn finite_separation(&self) -> Option<f64> {
        self.separation_arcmin.filter(|s| s.is_finite())
    }
}

/// JSON scalar as it appears in exported catalogs.
///
/// Identifiers arrive as either strings or integers, magnitudes sometimes as
/// numeric strings. Integers are matched before floats so 64-bit object ids
/// keep every digit.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    UInt(u64),
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    fn into_label(self) -> Option<String> {
        match self {
            Scalar::UInt(v) => Some(v.to_string()),
            Scalar::Int(v) => Some(v.to_string()),
            Scalar::Float(v) if v.is_finite() => Some(v.to_string()),
            Scalar::Float(_) | Scalar::Bool(_) => None,
            Scalar::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
        }
    }

    fn into_number(self) -> Option<f64> {
        let v = match self {
            Scalar::UInt(v) => v as f64,
            Scalar::Int(v) => v as f64,
            Scalar::Float(v) => v,
            Scalar::Bool(_) => return None,
            Scalar::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

/// Wire shape of one entry of the `records` array.
///
/// Every field is optional; absent, `null` and unparsable values all mean
/// "unknown" and never default to zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(default)]
    cid: Option<Scalar>,
    #[serde(default, rename = "objid_GAL")]
    objid_gal: Option<Scalar>,
    #[serde(default)]
    ra: Option<Scalar>,
    #[serde(default)]
    dec: Option<Scalar>,
    #[serde(default)]
    separation_arcmin: Option<Scalar>,
    #[serde(default, rename = "redshift_GAL")]
    redshift_gal: Option<Scalar>,
    #[serde(default, rename = "zCMB")]
    z_cmb: Option<Scalar>,
    #[serde(default)]
    u: Option<Scalar>,
    #[serde(default)]
    g: Option<Scalar>,
    #[serde(default)]
    r: Option<Scalar>,
    #[serde(default)]
    i: Option<Scalar>,
    #[serde(default)]
    z: Option<Scalar>,
}

fn number(v: Option<Scalar>) -> Option<f64> {
    v.and_then(Scalar::into_number)
}

impl RawRecord {
    /// Checks the optional-field schema once; downstream code only sees
    /// `Option`s.
    pub(crate) fn into_record(self, index: RecordIndex) -> Record {
        let position = match (number(self.ra), number(self.dec)) {
            (Some(ra), Some(dec)) => Some(RaDec::new(ra, dec)),
            _ => None,
        };

        Record {
            index,
            group: self.cid.and_then(Scalar::into_label).map(GroupId),
            object_id: self.objid_gal.and_then(Scalar::into_label),
            position,
            separation_arcmin: number(self.separation_arcmin),
            redshift_gal: number(self.redshift_gal),
            z_cmb: number(self.z_cmb),
            photometry: Photometry {
                u: number(self.u),
                g: number(self.g),
                r: number(self.r),
                i: number(self.i),
                z: number(self.z),
            },
        }
    }
}
