//! Emission of initialization operations
//!
//! [`emit`] turns a normalized document into the ordered steps that create
//! and wire one driver instance. The order is fixed:
//!
//! 1. declare the instance
//! 2. register the component, for variants with a standalone component step
//! 3. attach the instance to its I2C bus
//! 4. register the display (carrying the component registration otherwise)
//! 5. set width, then height, for variants with explicit dimensions
//! 6. attach the writer lambda, when one is configured
//!
//! The input must come from [`crate::validate::validate`] with the same
//! variant's schema. Anything missing or mistyped is a contract violation
//! and no operations are returned.

use thiserror::Error;

use crate::constants::{driver, keys};
use crate::schema::{DisplayBase, EnumChoice};
use crate::validate::{Identifier, NormalizedDocument, TimePeriod};
use crate::variant::{ComponentStep, Variant};

mod operation;
pub mod render;

pub use operation::{ComponentRegistration, EmittedOperation, FullDisplaySettings};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("internal error: normalized document for {variant} lacks {expected} field '{key}'")]
    ContractViolation {
        variant: Variant,
        key: &'static str,
        expected: &'static str,
    },
}

/// Typed field lookups that fail with a contract violation
struct Fields<'a> {
    variant: Variant,
    doc: &'a NormalizedDocument,
}

impl<'a> Fields<'a> {
    fn violation(&self, key: &'static str, expected: &'static str) -> EmitError {
        EmitError::ContractViolation {
            variant: self.variant,
            key,
            expected,
        }
    }

    fn identifier(&self, key: &'static str) -> Result<Identifier, EmitError> {
        self.doc
            .identifier(key)
            .cloned()
            .ok_or_else(|| self.violation(key, "identifier"))
    }

    fn int_as<T: TryFrom<i64>>(&self, key: &'static str) -> Result<T, EmitError> {
        self.doc
            .int(key)
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| self.violation(key, "integer"))
    }

    fn bool(&self, key: &'static str) -> Result<bool, EmitError> {
        self.doc.bool(key).ok_or_else(|| self.violation(key, "boolean"))
    }

    fn time_period(&self, key: &'static str) -> Result<TimePeriod, EmitError> {
        self.doc
            .time_period(key)
            .ok_or_else(|| self.violation(key, "time period"))
    }

    fn choice(&self, key: &'static str) -> Result<EnumChoice, EmitError> {
        self.doc
            .choice(key)
            .cloned()
            .ok_or_else(|| self.violation(key, "choice"))
    }

    fn component_registration(&self) -> Result<ComponentRegistration, EmitError> {
        let setup_priority = if self.doc.contains(keys::SETUP_PRIORITY) {
            Some(
                self.doc
                    .float(keys::SETUP_PRIORITY)
                    .ok_or_else(|| self.violation(keys::SETUP_PRIORITY, "float"))?,
            )
        } else {
            None
        };
        Ok(ComponentRegistration {
            update_interval: self.time_period(keys::UPDATE_INTERVAL)?,
            setup_priority,
        })
    }
}

/// Produce the initialization sequence for one validated instance
pub fn emit(
    variant: Variant,
    doc: &NormalizedDocument,
) -> Result<Vec<EmittedOperation>, EmitError> {
    let descriptor = variant.descriptor();
    let fields = Fields { variant, doc };
    let id = fields.identifier(keys::IDENTIFIER)?;
    let mut ops = Vec::new();

    ops.push(EmittedOperation::DeclareInstance {
        id: id.clone(),
        type_name: driver::TYPE,
    });

    let component = fields.component_registration()?;
    let folded_component = match descriptor.component_step {
        ComponentStep::Explicit => {
            ops.push(EmittedOperation::RegisterComponent {
                id: id.clone(),
                registration: component,
            });
            None
        }
        ComponentStep::FoldedIntoDisplay => Some(component),
    };

    ops.push(EmittedOperation::RegisterBusDevice {
        id: id.clone(),
        bus: fields.identifier(keys::I2C_ID)?,
        address: fields.int_as(keys::BUS_ADDRESS)?,
    });

    let settings = match descriptor.display_base {
        DisplayBase::Full => Some(FullDisplaySettings {
            rotation: fields.choice(keys::ROTATION)?,
            auto_clear: fields.bool(keys::AUTO_CLEAR_ENABLED)?,
            show_test_card: fields.bool(keys::SHOW_TEST_CARD)?,
        }),
        DisplayBase::Basic => None,
    };
    ops.push(EmittedOperation::RegisterDisplay {
        id: id.clone(),
        component: folded_component,
        settings,
    });

    if descriptor.explicit_dimensions {
        ops.push(EmittedOperation::SetWidth {
            id: id.clone(),
            width: fields.int_as(keys::WIDTH)?,
        });
        ops.push(EmittedOperation::SetHeight {
            id: id.clone(),
            height: fields.int_as(keys::HEIGHT)?,
        });
    }

    if doc.contains(keys::WRITER) {
        let writer = doc
            .lambda(keys::WRITER)
            .cloned()
            .ok_or_else(|| fields.violation(keys::WRITER, "lambda"))?;
        ops.push(EmittedOperation::AttachWriter { id, writer });
    }

    log::debug!(
        "Emitted {} operation(s) for {variant} instance '{}'",
        ops.len(),
        ops[0].id()
    );
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ConfigDocument;
    use crate::validate::{validate, TypedValue};
    use serde_json::{json, Value};

    fn normalized(variant: Variant, value: Value) -> NormalizedDocument {
        let Value::Object(map) = value else {
            panic!("not a mapping")
        };
        validate(variant.schema(), &ConfigDocument::from_map(map)).unwrap()
    }

    fn names(ops: &[EmittedOperation]) -> Vec<&'static str> {
        ops.iter().map(EmittedOperation::name).collect()
    }

    fn id(name: &str) -> Identifier {
        Identifier::parse(name).unwrap()
    }

    #[test]
    fn full_variant_without_writer() {
        let doc = normalized(
            Variant::Full,
            json!({"identifier": "disp1", "width": 144, "height": 9}),
        );
        let ops = emit(Variant::Full, &doc).unwrap();

        assert_eq!(
            names(&ops),
            vec![
                "declare_instance",
                "register_bus_device",
                "register_display",
                "set_width",
                "set_height"
            ]
        );
        assert_eq!(
            ops[1],
            EmittedOperation::RegisterBusDevice {
                id: id("disp1"),
                bus: id("i2c_bus"),
                address: 0x74,
            }
        );
        assert_eq!(
            ops[3],
            EmittedOperation::SetWidth {
                id: id("disp1"),
                width: 144
            }
        );
        assert_eq!(
            ops[4],
            EmittedOperation::SetHeight {
                id: id("disp1"),
                height: 9
            }
        );
        match &ops[2] {
            EmittedOperation::RegisterDisplay {
                component: Some(component),
                settings: Some(settings),
                ..
            } => {
                assert_eq!(component.update_interval, TimePeriod::Millis(60_000));
                assert_eq!(settings.rotation.name, "0");
                assert!(settings.auto_clear);
            }
            other => panic!("unexpected display registration {other:?}"),
        }
    }

    #[test]
    fn basic_v2_has_explicit_component_step() {
        let doc = normalized(Variant::BasicWithComponentStep, json!({"identifier": "disp2"}));
        let ops = emit(Variant::BasicWithComponentStep, &doc).unwrap();

        assert_eq!(
            names(&ops),
            vec![
                "declare_instance",
                "register_component",
                "register_bus_device",
                "register_display"
            ]
        );
        assert!(matches!(
            &ops[2],
            EmittedOperation::RegisterBusDevice { address: 0x76, .. }
        ));
        assert!(matches!(
            &ops[3],
            EmittedOperation::RegisterDisplay {
                component: None,
                settings: None,
                ..
            }
        ));
    }

    #[test]
    fn component_registration_happens_exactly_once() {
        for variant in Variant::ALL {
            let mut config = json!({"identifier": "d", "width": 8, "height": 8});
            if !variant.descriptor().explicit_dimensions {
                config = json!({"identifier": "d"});
            }
            let ops = emit(variant, &normalized(variant, config)).unwrap();
            let standalone = ops
                .iter()
                .filter(|op| matches!(op, EmittedOperation::RegisterComponent { .. }))
                .count();
            let folded = ops
                .iter()
                .filter(|op| {
                    matches!(
                        op,
                        EmittedOperation::RegisterDisplay {
                            component: Some(_),
                            ..
                        }
                    )
                })
                .count();
            assert_eq!(standalone + folded, 1, "{variant}");
        }
    }

    #[test]
    fn writer_is_attached_last() {
        let doc = normalized(
            Variant::Full,
            json!({
                "identifier": "disp1", "width": 16, "height": 9,
                "writer": "it.fill(COLOR_ON);"
            }),
        );
        let ops = emit(Variant::Full, &doc).unwrap();
        assert_eq!(
            names(&ops)[3..],
            ["set_width", "set_height", "attach_writer"]
        );
    }

    #[test]
    fn basic_variant_never_sets_dimensions() {
        let doc = normalized(
            Variant::Basic,
            json!({"identifier": "d", "writer": "it.fill(COLOR_OFF);"}),
        );
        let ops = emit(Variant::Basic, &doc).unwrap();
        assert_eq!(
            names(&ops),
            vec![
                "declare_instance",
                "register_bus_device",
                "register_display",
                "attach_writer"
            ]
        );
    }

    #[test]
    fn every_operation_targets_the_declared_instance() {
        let doc = normalized(
            Variant::Full,
            json!({"identifier": "panel", "width": 16, "height": 9, "writer": ""}),
        );
        let ops = emit(Variant::Full, &doc).unwrap();
        assert!(ops.iter().all(|op| op.id().as_str() == "panel"));
    }

    #[test]
    fn unvalidated_input_is_a_contract_violation() {
        let err = emit(Variant::Basic, &NormalizedDocument::default()).unwrap_err();
        assert_eq!(
            err,
            EmitError::ContractViolation {
                variant: Variant::Basic,
                key: keys::IDENTIFIER,
                expected: "identifier",
            }
        );

        // A basic-variant document lacks the full-variant display settings
        let doc = normalized(Variant::Basic, json!({"identifier": "d"}));
        let err = emit(Variant::Full, &doc).unwrap_err();
        assert!(matches!(
            err,
            EmitError::ContractViolation {
                key: keys::ROTATION,
                ..
            }
        ));
    }

    #[test]
    fn mistyped_field_is_a_contract_violation() {
        let mut doc = normalized(Variant::Basic, json!({"identifier": "d"}));
        doc.insert(keys::BUS_ADDRESS, TypedValue::Int(1000));
        let err = emit(Variant::Basic, &doc).unwrap_err();
        assert!(matches!(
            err,
            EmitError::ContractViolation {
                key: keys::BUS_ADDRESS,
                expected: "integer",
                ..
            }
        ));
    }

    #[test]
    fn mistyped_optional_fields_are_contract_violations() {
        let mut doc = normalized(Variant::Basic, json!({"identifier": "d"}));
        doc.insert(keys::SETUP_PRIORITY, TypedValue::Bool(true));
        assert!(matches!(
            emit(Variant::Basic, &doc).unwrap_err(),
            EmitError::ContractViolation {
                key: keys::SETUP_PRIORITY,
                expected: "float",
                ..
            }
        ));

        let mut doc = normalized(Variant::Basic, json!({"identifier": "d"}));
        doc.insert(keys::WRITER, TypedValue::Int(1));
        assert!(matches!(
            emit(Variant::Basic, &doc).unwrap_err(),
            EmitError::ContractViolation {
                key: keys::WRITER,
                expected: "lambda",
                ..
            }
        ));
    }
}
