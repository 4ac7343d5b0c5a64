use std::collections::BTreeMap;

use tablewright_core::{
    BaseKind, Datatype, DatatypeBase, LiteralTypeDef, Result, SlotDef, expand_curie,
};

/// Built-in types may not be attached as a datatype `@id`.
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
const SCHEMA_ORG_DATE: &str = "https://schema.org/Date";
const SCHEMA_ORG_DATE_TIME: &str = "https://schema.org/DateTime";

/// Marker for multivalued relation cells holding row identifiers.
pub const ID_TO_NODE_MARKER: &str = "ConvertIdToNode";
/// Marker for multivalued `uri` cells.
pub const IRI_TO_NODE_MARKER: &str = "ConvertIriToNode";

/// Map a literal type to its column datatype.
///
/// A non-XSD canonical URI is carried as the datatype `@id`; date and
/// datetime always carry the schema.org URI instead.
pub fn map_literal_type(
    literal: &LiteralTypeDef,
    prefixes: &BTreeMap<String, String>,
) -> Result<Datatype> {
    let kind = literal.base_kind()?;

    let mut id = match literal.uri.as_deref() {
        Some(uri) => {
            let expanded = expand_curie(uri, prefixes)?;
            (!expanded.starts_with(XSD_NAMESPACE)).then_some(expanded)
        }
        None => None,
    };

    let base = match kind {
        BaseKind::String | BaseKind::Uri => DatatypeBase::String,
        BaseKind::Date => {
            id = Some(SCHEMA_ORG_DATE.to_string());
            DatatypeBase::Date
        }
        BaseKind::DateTime => {
            id = Some(SCHEMA_ORG_DATE_TIME.to_string());
            DatatypeBase::Datetime
        }
        BaseKind::Int => DatatypeBase::Int,
        BaseKind::Decimal => DatatypeBase::Decimal,
    };

    Ok(Datatype {
        id,
        ..Datatype::base(base)
    })
}

/// Datatype of a literal-valued slot column, including the slot's pattern
/// and bounds. Multivalued `uri` slots get the node-conversion marker.
pub fn slot_datatype(
    slot: &SlotDef,
    literal: &LiteralTypeDef,
    prefixes: &BTreeMap<String, String>,
    identifier_namespace: &str,
) -> Result<Datatype> {
    if slot.multivalued && literal.base_kind()? == BaseKind::Uri {
        return Ok(Datatype::marked_string(format!(
            "{identifier_namespace}{IRI_TO_NODE_MARKER}"
        )));
    }

    let mut datatype = map_literal_type(literal, prefixes)?;
    datatype.format = slot.pattern.clone();
    datatype.minimum = slot.minimum_value;
    datatype.maximum = slot.maximum_value;
    Ok(datatype)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablewright_core::{Bound, Error};

    const NS: &str = "https://w3id.org/example/";

    fn prefixes() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("xsd".to_string(), XSD_NAMESPACE.to_string()),
            ("ex".to_string(), NS.to_string()),
        ])
    }

    fn literal(name: &str, base: &str, uri: Option<&str>) -> LiteralTypeDef {
        LiteralTypeDef {
            uri: uri.map(str::to_string),
            ..LiteralTypeDef::new(name, base)
        }
    }

    #[test]
    fn maps_every_supported_base() {
        let cases = [
            ("str", DatatypeBase::String),
            ("uri", DatatypeBase::String),
            ("XSDDate", DatatypeBase::Date),
            ("XSDDateTime", DatatypeBase::Datetime),
            ("int", DatatypeBase::Int),
            ("Decimal", DatatypeBase::Decimal),
        ];
        for (base, expected) in cases {
            let datatype = map_literal_type(&literal("t", base, None), &prefixes()).unwrap();
            assert_eq!(datatype.base, expected, "base {base}");
        }
    }

    #[test]
    fn unsupported_base_is_fatal() {
        let err = map_literal_type(&literal("ratio", "float", None), &prefixes()).unwrap_err();
        assert!(matches!(err, Error::SchemaIntegrity(_)));
    }

    #[test]
    fn xsd_uris_are_not_attached() {
        let datatype =
            map_literal_type(&literal("string", "str", Some("xsd:string")), &prefixes()).unwrap();
        assert_eq!(datatype.id, None);

        let datatype =
            map_literal_type(&literal("orcid", "str", Some("ex:Orcid")), &prefixes()).unwrap();
        assert_eq!(datatype.id.as_deref(), Some("https://w3id.org/example/Orcid"));
    }

    #[test]
    fn dates_carry_schema_org_uri() {
        let datatype =
            map_literal_type(&literal("date", "XSDDate", Some("xsd:date")), &prefixes()).unwrap();
        assert_eq!(datatype.id.as_deref(), Some(SCHEMA_ORG_DATE));
        assert_eq!(datatype.base, DatatypeBase::Date);
    }

    #[test]
    fn multivalued_uri_gets_marker() {
        let slot = SlotDef {
            multivalued: true,
            ..SlotDef::new("homepages", "uri")
        };
        let datatype = slot_datatype(&slot, &literal("uri", "uri", None), &prefixes(), NS).unwrap();
        assert_eq!(datatype.id.as_deref(), Some("https://w3id.org/example/ConvertIriToNode"));
        assert_eq!(datatype.base, DatatypeBase::String);
    }

    #[test]
    fn slot_constraints_are_copied() {
        let slot = SlotDef {
            pattern: Some("^[0-9]+$".to_string()),
            minimum_value: Some(Bound::Int(0)),
            maximum_value: Some(Bound::Decimal(9.5)),
            ..SlotDef::new("count", "integer")
        };
        let datatype = slot_datatype(&slot, &literal("integer", "int", None), &prefixes(), NS).unwrap();
        assert_eq!(datatype.format.as_deref(), Some("^[0-9]+$"));
        assert_eq!(datatype.minimum, Some(Bound::Int(0)));
        assert_eq!(datatype.maximum, Some(Bound::Decimal(9.5)));
    }
}
