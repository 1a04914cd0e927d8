pub mod osm;
pub mod records;

/// Elements as read from the .osm file, before any cleaning.
pub use self::osm::{ElementKind, RawTag, SourceElement};

/// Normalized rows ready for the relational tables.
pub use self::records::{CleanTag, PointRecord, ShapedRecord, WayNodeRef, WayRecord};
