//! Rendering of emitted operations as C++ initialization statements

use itertools::Itertools;

use crate::validate::{Identifier, Lambda};

use super::{ComponentRegistration, EmittedOperation, FullDisplaySettings};

const INDENT: &str = "  ";

/// Statements for one operation, in order
pub fn statements(op: &EmittedOperation) -> Vec<String> {
    match op {
        EmittedOperation::DeclareInstance { id, type_name } => {
            vec![format!("auto *{id} = new {type_name}();")]
        }
        EmittedOperation::RegisterComponent { id, registration } => {
            component_statements(id, registration)
        }
        EmittedOperation::RegisterBusDevice { id, bus, address } => vec![
            format!("{id}->set_i2c_bus({bus});"),
            format!("{id}->set_i2c_address(0x{address:02X});"),
        ],
        EmittedOperation::RegisterDisplay {
            id,
            component,
            settings,
        } => {
            let mut lines = component
                .as_ref()
                .map(|c| component_statements(id, c))
                .unwrap_or_default();
            if let Some(settings) = settings {
                lines.extend(display_settings_statements(id, settings));
            }
            lines.push(format!("App.register_display({id});"));
            lines
        }
        EmittedOperation::SetWidth { id, width } => vec![format!("{id}->set_width({width});")],
        EmittedOperation::SetHeight { id, height } => {
            vec![format!("{id}->set_height({height});")]
        }
        EmittedOperation::AttachWriter { id, writer } => {
            vec![format!("{id}->set_writer({});", lambda_expression(writer))]
        }
    }
}

/// Render a whole sequence, one statement per line
pub fn render(ops: &[EmittedOperation]) -> String {
    ops.iter().flat_map(statements).join("\n")
}

fn component_statements(id: &Identifier, registration: &ComponentRegistration) -> Vec<String> {
    let mut lines = vec![format!(
        "{id}->set_update_interval({});",
        registration.update_interval.as_scheduler_millis()
    )];
    if let Some(priority) = registration.setup_priority {
        lines.push(format!("{id}->set_setup_priority({});", float_literal(priority)));
    }
    lines.push(format!("App.register_component({id});"));
    lines
}

fn display_settings_statements(id: &Identifier, settings: &FullDisplaySettings) -> Vec<String> {
    let mut lines = vec![
        format!("{id}->set_rotation({});", settings.rotation.symbol),
        format!("{id}->set_auto_clear({});", settings.auto_clear),
    ];
    if settings.show_test_card {
        lines.push(format!("{id}->show_test_card();"));
    }
    lines
}

fn lambda_expression(lambda: &Lambda) -> String {
    let params = lambda
        .signature
        .params
        .iter()
        .map(|p| format!("{} {}", p.type_name, p.name))
        .join(", ");
    let body = lambda
        .body
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .join("\n");
    let open = format!("[=]({params}) -> {} {{", lambda.signature.return_type);
    if body.is_empty() {
        format!("{open}\n}}")
    } else {
        format!("{open}\n{body}\n}}")
    }
}

fn float_literal(value: f64) -> String {
    let text = value.to_string();
    if text.contains(['.', 'e', 'E']) {
        format!("{text}f")
    } else {
        format!("{text}.0f")
    }
}
