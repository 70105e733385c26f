use serde::Serialize;

use crate::schema::EnumChoice;
use crate::validate::{Identifier, Lambda, TimePeriod};

/// Polling and lifecycle settings handed to the component registry
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentRegistration {
    pub update_interval: TimePeriod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_priority: Option<f64>,
}

/// Settings only the full display base carries
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FullDisplaySettings {
    pub rotation: EnumChoice,
    pub auto_clear: bool,
    pub show_test_card: bool,
}

/// One initialization step against a driver instance
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EmittedOperation {
    DeclareInstance {
        id: Identifier,
        type_name: &'static str,
    },
    RegisterComponent {
        id: Identifier,
        #[serde(flatten)]
        registration: ComponentRegistration,
    },
    RegisterBusDevice {
        id: Identifier,
        bus: Identifier,
        address: u8,
    },
    RegisterDisplay {
        id: Identifier,
        /// Present when the variant has no standalone component step
        #[serde(skip_serializing_if = "Option::is_none")]
        component: Option<ComponentRegistration>,
        #[serde(skip_serializing_if = "Option::is_none")]
        settings: Option<FullDisplaySettings>,
    },
    SetWidth {
        id: Identifier,
        width: u32,
    },
    SetHeight {
        id: Identifier,
        height: u32,
    },
    AttachWriter {
        id: Identifier,
        writer: Lambda,
    },
}

impl EmittedOperation {
    pub fn id(&self) -> &Identifier {
        match self {
            EmittedOperation::DeclareInstance { id, .. }
            | EmittedOperation::RegisterComponent { id, .. }
            | EmittedOperation::RegisterBusDevice { id, .. }
            | EmittedOperation::RegisterDisplay { id, .. }
            | EmittedOperation::SetWidth { id, .. }
            | EmittedOperation::SetHeight { id, .. }
            | EmittedOperation::AttachWriter { id, .. } => id,
        }
    }

    /// Stable name of the step, as used in logs and JSON output
    pub fn name(&self) -> &'static str {
        match self {
            EmittedOperation::DeclareInstance { .. } => "declare_instance",
            EmittedOperation::RegisterComponent { .. } => "register_component",
            EmittedOperation::RegisterBusDevice { .. } => "register_bus_device",
            EmittedOperation::RegisterDisplay { .. } => "register_display",
            EmittedOperation::SetWidth { .. } => "set_width",
            EmittedOperation::SetHeight { .. } => "set_height",
            EmittedOperation::AttachWriter { .. } => "attach_writer",
        }
    }
}
