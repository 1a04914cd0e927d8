use super::tags::clean_tag;
use crate::data::{CleanTag, ElementKind, PointRecord, ShapedRecord, SourceElement, WayNodeRef, WayRecord};
use crate::errors::Result;

/// Turns one parsed element into its table rows. Returns `None` for element
/// kinds that have no tables.
pub fn shape(element: &SourceElement) -> Result<Option<ShapedRecord>> {
    let shaped = match element.kind {
        ElementKind::Point => {
            let point = PointRecord::from_element(element)?;
            let point_tags = clean_tags(&point.id, element);
            ShapedRecord::Point { point, point_tags }
        }
        ElementKind::Way => {
            let way = WayRecord::from_element(element)?;
            let way_tags = clean_tags(&way.id, element);
            let way_nodes = way_nodes(&way.id, element);
            ShapedRecord::Way {
                way,
                way_nodes,
                way_tags,
            }
        }
        ElementKind::Other => return Ok(None),
    };
    Ok(Some(shaped))
}

fn clean_tags(owner_id: &str, element: &SourceElement) -> Vec<CleanTag> {
    element
        .tags
        .iter()
        .filter_map(|raw| clean_tag(owner_id, raw))
        .collect()
}

fn way_nodes(way_id: &str, element: &SourceElement) -> Vec<WayNodeRef> {
    element
        .refs
        .iter()
        .enumerate()
        .map(|(position, node_id)| WayNodeRef {
            id: way_id.to_string(),
            node_id: node_id.clone(),
            position,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::data::records::{NODE_FIELDS, WAY_FIELDS};
    use crate::errors::Error;

    fn with_fields(kind: ElementKind, fields: &[&str], id: &str) -> SourceElement {
        fields.iter().fold(SourceElement::new(kind), |el, field| match *field {
            "id" => el.with_attribute(field, id),
            _ => el.with_attribute(field, &format!("{field}-of-{id}")),
        })
    }

    #[fixture]
    fn point() -> SourceElement {
        with_fields(ElementKind::Point, &NODE_FIELDS, "100")
            .with_tag("addr:street", "James St")
            .with_tag("bad,key", "x")
    }

    #[fixture]
    fn way() -> SourceElement {
        with_fields(ElementKind::Way, &WAY_FIELDS, "200")
            .with_tag("highway", "residential")
            .with_tag("tiger:zip_left", "13066")
            .with_tag("addr:postcode", "13066-1234")
            .with_ref("11")
            .with_ref("12")
            .with_ref("11")
    }

    #[rstest]
    fn shapes_point_and_drops_bad_tag(point: SourceElement) {
        let Some(ShapedRecord::Point { point, point_tags }) = shape(&point).unwrap() else {
            panic!("expected a point record");
        };
        assert_eq!(point.id, "100");
        assert_eq!(point.lat, "lat-of-100");
        assert_eq!(point.timestamp, "timestamp-of-100");
        assert_eq!(
            point_tags,
            vec![CleanTag {
                id: "100".into(),
                key: "street".into(),
                value: "James Street".into(),
                tag_type: "addr".into(),
            }]
        );
    }

    #[rstest]
    fn shapes_way_with_ordered_refs(way: SourceElement) {
        let Some(ShapedRecord::Way { way, way_nodes, way_tags }) = shape(&way).unwrap() else {
            panic!("expected a way record");
        };
        assert_eq!(way.id, "200");
        let refs: Vec<(&str, usize)> = way_nodes.iter().map(|r| (r.node_id.as_str(), r.position)).collect();
        assert_eq!(refs, vec![("11", 0), ("12", 1), ("11", 2)]);
        assert!(way_nodes.iter().all(|r| r.id == "200"));

        let keys: Vec<(&str, &str, &str)> = way_tags
            .iter()
            .map(|t| (t.tag_type.as_str(), t.key.as_str(), t.value.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("regular", "highway", "residential"),
                ("tiger", "zip_left", "13066"),
                ("addr", "postcode", "13066"),
            ]
        );
    }

    #[rstest]
    fn way_without_refs_has_no_way_nodes() {
        let el = with_fields(ElementKind::Way, &WAY_FIELDS, "5");
        let Some(ShapedRecord::Way { way_nodes, way_tags, .. }) = shape(&el).unwrap() else {
            panic!("expected a way record");
        };
        assert!(way_nodes.is_empty());
        assert!(way_tags.is_empty());
    }

    #[rstest]
    fn other_kinds_are_skipped() {
        let el = SourceElement::new(ElementKind::Other).with_tag("type", "multipolygon");
        assert_eq!(shape(&el).unwrap(), None);
    }

    #[rstest]
    fn way_without_user_is_fatal() {
        let mut el = with_fields(ElementKind::Way, &WAY_FIELDS, "5");
        el.attributes.remove("user");
        assert!(matches!(
            shape(&el),
            Err(Error::MissingAttribute { ref attribute, .. }) if attribute == "user"
        ));
    }

    #[rstest]
    fn point_does_not_need_way_only_refs() {
        let el = with_fields(ElementKind::Point, &NODE_FIELDS, "9").with_ref("1");
        let shaped = shape(&el).unwrap().unwrap();
        assert!(matches!(shaped, ShapedRecord::Point { .. }));
    }

    proptest! {
        #[test]
        fn way_positions_are_contiguous(refs in proptest::collection::vec("[0-9]{1,6}", 0..64)) {
            let el = refs.iter().fold(with_fields(ElementKind::Way, &WAY_FIELDS, "1"), |el, r| el.with_ref(r));
            let Some(ShapedRecord::Way { way_nodes, .. }) = shape(&el).unwrap() else {
                panic!("expected a way record");
            };
            prop_assert_eq!(way_nodes.len(), refs.len());
            for (index, (node, expected)) in way_nodes.iter().zip(&refs).enumerate() {
                prop_assert_eq!(node.position, index);
                prop_assert_eq!(&node.node_id, expected);
            }
        }

        #[test]
        fn tags_always_carry_owner_id(id in "[1-9][0-9]{0,9}", keys in proptest::collection::vec("[a-z:,]{1,10}", 0..16)) {
            let el = keys.iter().fold(with_fields(ElementKind::Point, &NODE_FIELDS, &id), |el, k| el.with_tag(k, "v"));
            let shaped = shape(&el).unwrap().unwrap();
            prop_assert!(shaped.tags().iter().all(|t| t.id == id));
            prop_assert_eq!(shaped.id(), id.as_str());
        }
    }
}
