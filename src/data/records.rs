use serde::Serialize;

use super::osm::SourceElement;
use crate::errors::Result;

// Column orders must match the consuming SQL table schema.
pub const NODE_FIELDS: [&str; 8] = ["id", "lat", "lon", "user", "uid", "version", "changeset", "timestamp"];
pub const NODE_TAGS_FIELDS: [&str; 4] = ["id", "key", "value", "type"];
pub const WAY_FIELDS: [&str; 6] = ["id", "user", "uid", "version", "changeset", "timestamp"];
pub const WAY_TAGS_FIELDS: [&str; 4] = ["id", "key", "value", "type"];
pub const WAY_NODES_FIELDS: [&str; 3] = ["id", "node_id", "position"];

/// Attributes of a `<node>`, copied verbatim.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PointRecord {
    pub id: String,
    pub lat: String,
    pub lon: String,
    pub user: String,
    pub uid: String,
    pub version: String,
    pub changeset: String,
    pub timestamp: String,
}

impl PointRecord {
    pub fn from_element(element: &SourceElement) -> Result<PointRecord> {
        let [id, lat, lon, user, uid, version, changeset, timestamp] =
            NODE_FIELDS.map(|field| element.attribute(field).map(str::to_string));
        Ok(PointRecord {
            id: id?,
            lat: lat?,
            lon: lon?,
            user: user?,
            uid: uid?,
            version: version?,
            changeset: changeset?,
            timestamp: timestamp?,
        })
    }
}

/// Attributes of a `<way>`. Ways carry no coordinates of their own.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WayRecord {
    pub id: String,
    pub user: String,
    pub uid: String,
    pub version: String,
    pub changeset: String,
    pub timestamp: String,
}

impl WayRecord {
    pub fn from_element(element: &SourceElement) -> Result<WayRecord> {
        let [id, user, uid, version, changeset, timestamp] =
            WAY_FIELDS.map(|field| element.attribute(field).map(str::to_string));
        Ok(WayRecord {
            id: id?,
            user: user?,
            uid: uid?,
            version: version?,
            changeset: changeset?,
            timestamp: timestamp?,
        })
    }
}

/// A tag that survived classification. `key` never contains the namespace.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CleanTag {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub tag_type: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WayNodeRef {
    pub id: String,
    pub node_id: String,
    pub position: usize,
}

/// Serializes as `{"node": .., "node_tags": [..]}` or
/// `{"way": .., "way_nodes": [..], "way_tags": [..]}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ShapedRecord {
    Point {
        #[serde(rename = "node")]
        point: PointRecord,
        #[serde(rename = "node_tags")]
        point_tags: Vec<CleanTag>,
    },
    Way {
        way: WayRecord,
        way_nodes: Vec<WayNodeRef>,
        way_tags: Vec<CleanTag>,
    },
}

impl ShapedRecord {
    pub fn id(&self) -> &str {
        match self {
            ShapedRecord::Point { point, .. } => &point.id,
            ShapedRecord::Way { way, .. } => &way.id,
        }
    }

    pub fn tags(&self) -> &[CleanTag] {
        match self {
            ShapedRecord::Point { point_tags, .. } => point_tags,
            ShapedRecord::Way { way_tags, .. } => way_tags,
        }
    }
}
