use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::CatalogError;
use crate::record::{GroupId, RawRecord, Record, RecordIndex};

/// Records sharing one supernova identifier, in record order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub members: Vec<RecordIndex>,
}

/// Entry of the supernova list shown next to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupListing {
    pub id: GroupId,
    pub host_count: usize,
}

impl std::fmt::Display for GroupListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (hosts: {})", self.id, self.host_count)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    records: Option<Vec<RawRecord>>,
}

/// Flat record list plus the derived supernova grouping.
///
/// Invariants:
/// - `records[i].index == RecordIndex(i)` for every record.
/// - The group map is rebuilt from scratch whenever the record list changes;
///   it is never patched.
/// - Groups iterate in order of first appearance in the record list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Record>,
    groups: Vec<Group>,
    group_lookup: HashMap<GroupId, usize>,
}

impl Catalog {
    pub fn new(records: Vec<Record>) -> Self {
        let mut catalog = Self {
            records,
            groups: Vec::new(),
            group_lookup: HashMap::new(),
        };
        catalog.rebuild();
        catalog
    }

    /// Parses a catalog document (`{"records": [...]}`).
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        let doc: CatalogDocument =
            serde_json::from_slice(bytes).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Reads and parses a catalog file, returning it with its content id.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, String), CatalogError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CatalogError::Io(format!("read {}: {e}", path.display())))?;
        let catalog = Self::from_json_slice(&bytes)?;
        Ok((catalog, content_id(&bytes)))
    }

    fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        let raw = doc.records.ok_or(CatalogError::MissingRecords)?;
        let records = raw
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_record(RecordIndex(i as u32)))
            .collect();
        Ok(Self::new(records))
    }

    /// Replaces the whole record list.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.rebuild();
    }

    /// Mutates one record in place; the change is visible through every
    /// index-based lookup. Returns `false` for an unknown index.
    pub fn update_record(&mut self, index: RecordIndex, f: impl FnOnce(&mut Record)) -> bool {
        let Some(record) = self.records.get_mut(index.as_usize()) else {
            return false;
        };
        f(record);
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        for (i, r) in self.records.iter_mut().enumerate() {
            r.index = RecordIndex(i as u32);
        }

        self.groups.clear();
        self.group_lookup.clear();
        for r in &self.records {
            let Some(id) = &r.group else {
                continue;
            };
            let slot = match self.group_lookup.get(id) {
                Some(&slot) => slot,
                None => {
                    self.groups.push(Group {
                        id: id.clone(),
                        members: Vec::new(),
                    });
                    self.group_lookup.insert(id.clone(), self.groups.len() - 1);
                    self.groups.len() - 1
                }
            };
            self.groups[slot].members.push(r.index);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: RecordIndex) -> Option<&Record> {
        self.records.get(index.as_usize())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.group_lookup.get(id).map(|&slot| &self.groups[slot])
    }

    pub fn first_group(&self) -> Option<&Group> {
        self.groups.first()
    }

    /// Anchor record of a group (see [`pick_anchor`]).
    pub fn anchor(&self, id: &GroupId) -> Option<RecordIndex> {
        let group = self.group(id)?;
        pick_anchor(&self.records, &group.members)
    }

    /// Groups sorted by identifier, with host counts.
    pub fn listing(&self) -> Vec<GroupListing> {
        let mut out: Vec<GroupListing> = self
            .groups
            .iter()
            .map(|g| GroupListing {
                id: g.id.clone(),
                host_count: g.members.len(),
            })
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }
}

/// Member with the smallest finite separation; the first member when none
/// has one. Supernovae carry no coordinates, so this record stands in for
/// the group's sky position.
///
/// Ties keep the earlier member.
pub fn pick_anchor(records: &[Record], members: &[RecordIndex]) -> Option<RecordIndex> {
    let mut best: Option<(f64, RecordIndex)> = None;
    for &idx in members {
        let Some(sep) = records.get(idx.as_usize()).and_then(Record::finite_separation) else {
            continue;
        };
        if best.is_none_or(|(b, _)| sep < b) {
            best = Some((sep, idx));
        }
    }
    best.map(|(_, idx)| idx).or_else(|| members.first().copied())
}

/// BLAKE3 hex digest of a catalog document's bytes.
pub fn content_id(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
