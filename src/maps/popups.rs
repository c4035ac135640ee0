// ============================================================================
// POPUPS - HTML de los popups a partir de las propiedades de la feature
// ============================================================================
// Todo valor se escapa: los ids y direcciones vienen de CSV y de la API.
// ============================================================================

use html_escape::encode_text;
use serde_json::{Map, Value};

use super::paint::{COMPLETED_COLOR, PENDING_COLOR};
use super::traits::PopupKind;

pub const DEPOT_POPUP_HTML: &str =
    r#"<div style="padding: 8px;"><strong>DEPOT</strong><br/>Starting Point</div>"#;

fn text(props: &Map<String, Value>, key: &str) -> String {
    match props.get(key) {
        Some(Value::String(s)) => encode_text(s).into_owned(),
        Some(Value::Null) | None => String::new(),
        Some(other) => encode_text(&other.to_string()).into_owned(),
    }
}

pub fn popup_html(kind: PopupKind, props: &Map<String, Value>) -> String {
    match kind {
        PopupKind::Route => {
            let vehicle_type = match text(props, "vehicle_type") {
                t if t.is_empty() => "Unknown".to_string(),
                t => t,
            };
            format!(
                r#"<div style="padding: 12px; min-width: 200px;">
<div style="display: flex; align-items: center; gap: 8px; margin-bottom: 8px;">
<div style="width: 16px; height: 16px; background-color: {}; border-radius: 50%;"></div>
<strong style="font-size: 16px;">{}</strong></div>
<div style="color: #666; margin-bottom: 4px;"><strong>Type:</strong> {}</div>
<div style="color: #666;"><strong>Stops:</strong> {} deliveries</div></div>"#,
                text(props, "color"),
                text(props, "vehicle_id"),
                vehicle_type,
                text(props, "deliveries"),
            )
        }
        PopupKind::Stop => format!(
            r#"<div style="padding: 8px;"><strong>{}</strong><br/>Stop #{}</div>"#,
            text(props, "vehicle_id"),
            text(props, "stop_number"),
        ),
        PopupKind::Delivery => {
            let completed = props.get("status").and_then(Value::as_str) == Some("completed");
            let (color, label) = if completed {
                (COMPLETED_COLOR, "✓ Completed")
            } else {
                (PENDING_COLOR, "⏰ Pending")
            };
            format!(
                r#"<div style="padding: 8px;"><strong>Stop #{}</strong><br/><strong>{}</strong><br/>
<span style="font-size: 12px;">{}</span><br/>
<span style="font-size: 12px;">{} packages</span><br/>
<span style="font-size: 12px;">Delivery: {}</span><br/>
<span style="font-size: 11px; color: {};">{}</span></div>"#,
                text(props, "sequenceNumber"),
                text(props, "orderId"),
                text(props, "address"),
                text(props, "packages"),
                text(props, "time"),
                color,
                label,
            )
        }
    }
}
