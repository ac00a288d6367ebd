use bevy::prelude::*;

use super::color::HexColor;
use super::part::Part;

/// Color per part. The key set is the closed `Part` enum, so it can never
/// grow or shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartColors([HexColor; Part::COUNT]);

impl PartColors {
    pub fn filled(color: HexColor) -> Self {
        Self([color; Part::COUNT])
    }

    pub fn get(&self, part: Part) -> HexColor {
        self.0[part.index()]
    }

    /// Returns `true` if the stored value changed.
    pub fn set(&mut self, part: Part, color: HexColor) -> bool {
        debug_assert!(part.index() < Part::COUNT);
        let slot = &mut self.0[part.index()];
        if *slot == color {
            return false;
        }
        *slot = color;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Part, HexColor)> + '_ {
        Part::ALL.into_iter().map(|p| (p, self.get(p)))
    }
}

impl Default for PartColors {
    fn default() -> Self {
        Self::filled(HexColor::WHITE)
    }
}

/// The single source of truth shared by the 3D scene and the UI overlay.
///
/// Systems only ever read it through `Res`; every write goes through
/// [`SelectionCommand`] and [`SelectionState::apply`].
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub selected: Option<Part>,
    pub checkout_open: bool,
    pub colors: PartColors,
}

impl SelectionState {
    /// Color of the selected part, if any.
    pub fn selected_color(&self) -> Option<HexColor> {
        self.selected.map(|p| self.colors.get(p))
    }

    /// Applies one write. Returns `true` if any field changed.
    pub fn apply(&mut self, command: &SelectionCommand) -> bool {
        match *command {
            SelectionCommand::Select(part) => replace(&mut self.selected, Some(part)),
            SelectionCommand::ClearSelection => replace(&mut self.selected, None),
            SelectionCommand::SetColor(color) => match self.selected {
                Some(part) => self.colors.set(part, color),
                None => {
                    debug!("Ignoring color {color}: no part selected");
                    false
                }
            },
            SelectionCommand::OpenCheckout => replace(&mut self.checkout_open, true),
            SelectionCommand::CloseCheckout => replace(&mut self.checkout_open, false),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Every write to [`SelectionState`], from pointer observers and UI widgets.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum SelectionCommand {
    Select(Part),
    ClearSelection,
    /// Recolors whichever part is selected when the command is applied.
    SetColor(HexColor),
    OpenCheckout,
    CloseCheckout,
}
