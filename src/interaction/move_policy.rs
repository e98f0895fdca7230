use serde::{Deserialize, Serialize};

/// How pointer-move events turn into edits while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovePolicy {
    /// One edit per move event, in dispatch order.
    Immediate,
    /// Keep only the latest value and apply it once per rendered frame.
    CoalescePerFrame,
}

impl Default for MovePolicy {
    fn default() -> Self {
        MovePolicy::Immediate
    }
}

impl MovePolicy {
    pub const ALL: [MovePolicy; 2] = [MovePolicy::Immediate, MovePolicy::CoalescePerFrame];

    pub fn label(&self) -> &'static str {
        match self {
            MovePolicy::Immediate => "Every move",
            MovePolicy::CoalescePerFrame => "Once per frame",
        }
    }
}
