//! Platform variants of the IS31FL3731 display component
//!
//! Every variant is a parameterization of the same compose/validate/emit
//! pipeline. The differences live in [`VariantDescriptor`].

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::constants::defaults;
use crate::schema::{compose, fragments, DisplayBase, Schema};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Full,
    BasicWithComponentStep,
    Basic,
}

/// Where the component registration (polling, setup priority) is emitted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStep {
    /// A standalone step right after the instance is declared
    Explicit,
    /// Carried by the display registration
    FoldedIntoDisplay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct VariantDescriptor {
    pub platform: &'static str,
    pub display_base: DisplayBase,
    pub default_address: u8,
    pub explicit_dimensions: bool,
    pub component_step: ComponentStep,
}

const FULL: VariantDescriptor = VariantDescriptor {
    platform: "is31fl3731",
    display_base: DisplayBase::Full,
    default_address: defaults::I2C_ADDRESS_LOW,
    explicit_dimensions: true,
    component_step: ComponentStep::FoldedIntoDisplay,
};

const BASIC_WITH_COMPONENT_STEP: VariantDescriptor = VariantDescriptor {
    platform: "is31fl3731_basic_v2",
    display_base: DisplayBase::Basic,
    default_address: defaults::I2C_ADDRESS_HIGH,
    explicit_dimensions: false,
    component_step: ComponentStep::Explicit,
};

const BASIC: VariantDescriptor = VariantDescriptor {
    platform: "is31fl3731_basic",
    display_base: DisplayBase::Basic,
    default_address: defaults::I2C_ADDRESS_LOW,
    explicit_dimensions: false,
    component_step: ComponentStep::FoldedIntoDisplay,
};

static FULL_SCHEMA: Lazy<Schema> = Lazy::new(|| Variant::Full.compose());
static BASIC_WITH_COMPONENT_STEP_SCHEMA: Lazy<Schema> =
    Lazy::new(|| Variant::BasicWithComponentStep.compose());
static BASIC_SCHEMA: Lazy<Schema> = Lazy::new(|| Variant::Basic.compose());

impl Variant {
    pub const ALL: [Variant; 3] = [
        Variant::Full,
        Variant::BasicWithComponentStep,
        Variant::Basic,
    ];

    pub const fn descriptor(self) -> &'static VariantDescriptor {
        match self {
            Variant::Full => &FULL,
            Variant::BasicWithComponentStep => &BASIC_WITH_COMPONENT_STEP,
            Variant::Basic => &BASIC,
        }
    }

    pub fn platform(self) -> &'static str {
        self.descriptor().platform
    }

    pub fn from_platform(platform: &str) -> Option<Variant> {
        Variant::ALL.into_iter().find(|v| v.platform() == platform)
    }

    pub fn platforms() -> impl Iterator<Item = &'static str> {
        Variant::ALL.into_iter().map(Variant::platform)
    }

    /// Compose a fresh schema for this variant
    pub fn compose(self) -> Schema {
        let descriptor = self.descriptor();
        let extra_required = if descriptor.explicit_dimensions {
            fragments::matrix_dimensions_schema()
        } else {
            Schema::new()
        };
        compose(
            descriptor.display_base,
            &extra_required,
            defaults::POLLING_UPDATE_INTERVAL,
            descriptor.default_address,
        )
    }

    /// The variant's schema, composed once and shared afterwards
    pub fn schema(self) -> &'static Schema {
        match self {
            Variant::Full => &FULL_SCHEMA,
            Variant::BasicWithComponentStep => &BASIC_WITH_COMPONENT_STEP_SCHEMA,
            Variant::Basic => &BASIC_SCHEMA,
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.platform())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::keys;

    #[test]
    fn platforms_round_trip() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_platform(variant.platform()), Some(variant));
        }
        assert_eq!(Variant::from_platform("ssd1306_i2c"), None);
    }

    #[test]
    fn cached_schema_matches_fresh_composition() {
        for variant in Variant::ALL {
            assert_eq!(variant.schema(), &variant.compose());
        }
    }

    #[test]
    fn only_full_variant_takes_dimensions() {
        assert!(Variant::Full.schema().contains(keys::WIDTH));
        assert!(!Variant::Basic.schema().contains(keys::WIDTH));
        assert!(!Variant::BasicWithComponentStep.schema().contains(keys::HEIGHT));
    }
}
