//! Schema fragments shared by every display platform
//!
//! These mirror the building blocks the surrounding build offers to display
//! components: the display base schemas, the polling schema, the I2C device
//! schema and the generic component schema.

use crate::constants::{defaults, driver, keys};

use super::{EnumChoice, LambdaParam, LambdaSignature, Schema, SchemaNode, ValueKind};

pub fn writer_signature() -> LambdaSignature {
    LambdaSignature::new(
        vec![LambdaParam::new(driver::REF_TYPE, driver::WRITER_PARAM)],
        driver::WRITER_RETURN_TYPE,
    )
}

pub fn rotation_choices() -> Vec<EnumChoice> {
    vec![
        EnumChoice {
            name: "0",
            symbol: "display::DISPLAY_ROTATION_0_DEGREES",
        },
        EnumChoice {
            name: "90",
            symbol: "display::DISPLAY_ROTATION_90_DEGREES",
        },
        EnumChoice {
            name: "180",
            symbol: "display::DISPLAY_ROTATION_180_DEGREES",
        },
        EnumChoice {
            name: "270",
            symbol: "display::DISPLAY_ROTATION_270_DEGREES",
        },
    ]
}

/// Writer lambda plus the display's own refresh interval
pub fn basic_display_schema() -> Schema {
    Schema::from_nodes([
        SchemaNode::optional(
            keys::WRITER,
            ValueKind::Lambda {
                signature: writer_signature(),
            },
        ),
        SchemaNode::optional(keys::UPDATE_INTERVAL, ValueKind::Duration)
            .with_default(defaults::DISPLAY_UPDATE_INTERVAL),
    ])
}

/// Basic display schema plus orientation and frame handling
pub fn full_display_schema() -> Schema {
    basic_display_schema().extend(&Schema::from_nodes([
        SchemaNode::optional(
            keys::ROTATION,
            ValueKind::Enumerated {
                choices: rotation_choices(),
            },
        )
        .with_default(0),
        SchemaNode::optional(keys::AUTO_CLEAR_ENABLED, ValueKind::Boolean).with_default(true),
        SchemaNode::optional(keys::SHOW_TEST_CARD, ValueKind::Boolean).with_default(false),
    ]))
}

pub fn polling_component_schema(default_interval: &str) -> Schema {
    Schema::from_nodes([
        SchemaNode::optional(keys::UPDATE_INTERVAL, ValueKind::Duration)
            .with_default(default_interval),
    ])
}

pub fn i2c_device_schema(default_address: u8) -> Schema {
    Schema::from_nodes([
        SchemaNode::optional(keys::I2C_ID, ValueKind::IdReference)
            .with_default(defaults::I2C_BUS_ID),
        SchemaNode::optional(
            keys::BUS_ADDRESS,
            ValueKind::IntRange {
                min: 0,
                max: defaults::I2C_ADDRESS_MAX,
            },
        )
        .with_default(default_address),
    ])
}

pub fn component_schema() -> Schema {
    Schema::from_nodes([SchemaNode::optional(keys::SETUP_PRIORITY, ValueKind::Float)])
}

/// Required width and height of the LED matrix
pub fn matrix_dimensions_schema() -> Schema {
    let dimension = ValueKind::IntRange {
        min: defaults::MATRIX_DIMENSION_MIN,
        max: defaults::MATRIX_DIMENSION_MAX,
    };
    Schema::from_nodes([
        SchemaNode::required(keys::WIDTH, dimension.clone()),
        SchemaNode::required(keys::HEIGHT, dimension),
    ])
}

pub fn identifier_node() -> SchemaNode {
    SchemaNode::required(
        keys::IDENTIFIER,
        ValueKind::IdDeclaration {
            type_name: driver::TYPE,
        },
    )
    .locked()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_display_extends_basic() {
        let basic = basic_display_schema();
        let full = full_display_schema();
        for key in basic.keys() {
            assert!(full.contains(key), "full display schema lacks '{key}'");
        }
        assert!(full.contains(keys::ROTATION));
        assert!(!basic.contains(keys::ROTATION));
    }

    #[test]
    fn i2c_device_schema_uses_given_default() {
        let schema = i2c_device_schema(0x76);
        assert_eq!(schema.get(keys::BUS_ADDRESS).unwrap().default, Some(json!(0x76)));
    }
}
