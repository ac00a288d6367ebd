use bevy::prelude::*;

use super::part::Part;

/// Part currently under the pointer. Local to the scene: it drives the
/// cursor only and is never written into [`super::state::SelectionState`].
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    pub hovered: Option<Part>,
}

impl HoverState {
    /// Switches straight to `part`, even if another part is still hovered.
    pub fn enter(&mut self, part: Part) {
        self.hovered = Some(part);
    }

    /// Called when the pointer leaves a part mesh. `remaining_part_hits` is
    /// the number of other part meshes still under the pointer.
    pub fn leave(&mut self, remaining_part_hits: usize) {
        if remaining_part_hits == 0 {
            self.hovered = None;
        }
    }
}
