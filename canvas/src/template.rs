//! Built-in starter designs.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use serde::{Deserialize, Serialize};

use crate::doc::{Shape, ShapeId, ShapeKind, Snapshot, Style};

/// A named starter design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Template {
    /// A peach disc with a bold "HELLO" across it.
    RoundBadge,
}

impl Template {
    pub const ALL: [Template; 1] = [Template::RoundBadge];

    #[must_use]
    pub fn snapshot(self) -> Snapshot {
        match self {
            Self::RoundBadge => Snapshot {
                objects: vec![
                    Shape {
                        id: ShapeId::from("t1"),
                        x: 400.0,
                        y: 360.0,
                        style: Style {
                            fill: "#FFEDD5".into(),
                            stroke: "#FB5607".into(),
                            stroke_width: 6.0,
                            opacity: 1.0,
                        },
                        kind: ShapeKind::Circle { r: 220.0 },
                    },
                    Shape {
                        id: ShapeId::from("t2"),
                        x: 400.0,
                        y: 360.0,
                        style: Style { fill: "#111827".into(), ..Style::default() },
                        kind: ShapeKind::Text {
                            text: "HELLO".into(),
                            font_size: 56.0,
                            font_family: "Helvetica".into(),
                            bold: true,
                        },
                    },
                ],
            },
        }
    }
}
