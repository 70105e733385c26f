use serde::Serialize;

use super::{fragments, Schema};

/// Which display base schema a component builds on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayBase {
    Basic,
    Full,
}

impl DisplayBase {
    pub fn schema(self) -> Schema {
        match self {
            DisplayBase::Basic => fragments::basic_display_schema(),
            DisplayBase::Full => fragments::full_display_schema(),
        }
    }
}

/// Compose the accepted configuration shape of one display component
///
/// Fragments are merged in a fixed order, so later fragments override
/// earlier ones: identifier, display base, component fields, polling,
/// I2C device, generic component.
pub fn compose(
    display_base: DisplayBase,
    extra_required: &Schema,
    polling_default: &str,
    bus_address_default: u8,
) -> Schema {
    let schema = Schema::from_nodes([fragments::identifier_node()])
        .extend(&display_base.schema())
        .extend(extra_required)
        .extend(&fragments::polling_component_schema(polling_default))
        .extend(&fragments::i2c_device_schema(bus_address_default))
        .extend(&fragments::component_schema());

    log::debug!(
        "Composed {:?} display schema with {} fields",
        display_base,
        schema.len()
    );
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::keys;
    use crate::schema::{SchemaNode, ValueKind};
    use serde_json::json;

    #[test]
    fn compose_is_deterministic() {
        let extra = fragments::matrix_dimensions_schema();
        let a = compose(DisplayBase::Full, &extra, "60s", 0x74);
        let b = compose(DisplayBase::Full, &extra, "60s", 0x74);
        assert_eq!(a, b);
    }

    #[test]
    fn polling_default_overrides_display_default() {
        let schema = compose(DisplayBase::Basic, &Schema::new(), "60s", 0x74);
        assert_eq!(
            schema.get(keys::UPDATE_INTERVAL).unwrap().default,
            Some(json!("60s"))
        );
    }

    #[test]
    fn identifier_always_first_and_required() {
        let hostile = Schema::from_nodes([SchemaNode::optional(keys::IDENTIFIER, ValueKind::Boolean)]);
        let schema = compose(DisplayBase::Basic, &hostile, "60s", 0x76);

        let first = &schema.nodes()[0];
        assert_eq!(first.key, keys::IDENTIFIER);
        assert!(first.is_required());
        assert!(matches!(first.kind, ValueKind::IdDeclaration { .. }));
    }

    #[test]
    fn full_base_with_dimensions_requires_width_and_height() {
        let schema = compose(
            DisplayBase::Full,
            &fragments::matrix_dimensions_schema(),
            "60s",
            0x74,
        );
        assert_eq!(
            schema.required_keys().collect::<Vec<_>>(),
            vec![keys::IDENTIFIER, keys::WIDTH, keys::HEIGHT]
        );
        assert_eq!(schema.get(keys::BUS_ADDRESS).unwrap().default, Some(json!(0x74)));
    }

    #[test]
    fn basic_base_has_no_dimensions() {
        let schema = compose(DisplayBase::Basic, &Schema::new(), "60s", 0x76);
        assert!(!schema.contains(keys::WIDTH));
        assert!(!schema.contains(keys::HEIGHT));
        assert!(!schema.contains(keys::ROTATION));
        assert!(schema.contains(keys::WRITER));
        assert!(schema.contains(keys::SETUP_PRIORITY));
    }
}
