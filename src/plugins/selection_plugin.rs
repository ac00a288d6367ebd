use bevy::prelude::*;

use crate::configurator::hover::HoverState;
use crate::configurator::state::{SelectionCommand, SelectionState};

// ── SystemSets (Update ordering for every store reader/writer) ──────

/// Writers queue [`SelectionCommand`]s in `Input`, the reducer applies them
/// in `Apply`, readers render the new snapshot in `Present`. Readers gate on
/// `resource_changed::<SelectionState>`, which only fires when `Apply`
/// actually changed something.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfiguratorSet {
    Input,
    Apply,
    Present,
}

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionState>();
        app.init_resource::<HoverState>();
        app.add_message::<SelectionCommand>();

        app.configure_sets(
            Update,
            (
                ConfiguratorSet::Input,
                ConfiguratorSet::Apply,
                ConfiguratorSet::Present,
            )
                .chain(),
        );
        app.add_systems(Update, apply_selection_commands.in_set(ConfiguratorSet::Apply));
    }
}

/// The only system holding `ResMut<SelectionState>`.
pub fn apply_selection_commands(
    mut commands: MessageReader<SelectionCommand>,
    mut state: ResMut<SelectionState>,
) {
    let mut changed = false;
    for command in commands.read() {
        if state.bypass_change_detection().apply(command) {
            debug!("Selection: {command:?} -> selected={:?} checkout_open={}", state.selected, state.checkout_open);
            changed = true;
        }
    }
    if changed {
        state.set_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurator::color::HexColor;
    use crate::configurator::part::Part;

    #[derive(Resource, Default)]
    struct Renders(u32);

    fn count_renders(mut renders: ResMut<Renders>) {
        renders.0 += 1;
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(SelectionPlugin);
        app.init_resource::<Renders>();
        app.add_systems(
            Update,
            count_renders
                .run_if(resource_changed::<SelectionState>)
                .in_set(ConfiguratorSet::Present),
        );
        // first frame always sees the freshly inserted resource as changed
        app.update();
        app.world_mut().resource_mut::<Renders>().0 = 0;
        app
    }

    fn send(app: &mut App, command: SelectionCommand) {
        app.world_mut().write_message(command);
        app.update();
    }

    #[test]
    fn test_commands_are_applied_in_order() {
        let mut app = test_app();
        app.world_mut().write_message(SelectionCommand::Select(Part::Laces));
        app.world_mut().write_message(SelectionCommand::SetColor(HexColor::rgb(255, 0, 0)));
        app.world_mut().write_message(SelectionCommand::Select(Part::Sole));
        app.update();

        let state = app.world().resource::<SelectionState>();
        assert_eq!(state.selected, Some(Part::Sole));
        assert_eq!(state.colors.get(Part::Laces), HexColor::rgb(255, 0, 0));
        assert_eq!(state.colors.get(Part::Sole), HexColor::WHITE);
        // one batch, one notification
        assert_eq!(app.world().resource::<Renders>().0, 1);
    }

    #[test]
    fn test_no_op_writes_do_not_notify() {
        let mut app = test_app();
        send(&mut app, SelectionCommand::Select(Part::Mesh));
        assert_eq!(app.world().resource::<Renders>().0, 1);

        send(&mut app, SelectionCommand::Select(Part::Mesh));
        send(&mut app, SelectionCommand::CloseCheckout);
        assert_eq!(app.world().resource::<Renders>().0, 1);
    }

    #[test]
    fn test_laces_scenario_through_the_app() {
        let mut app = test_app();
        send(&mut app, SelectionCommand::Select(Part::Laces));
        send(&mut app, SelectionCommand::SetColor("#ff0000".parse().unwrap()));
        send(&mut app, SelectionCommand::ClearSelection);

        let state = app.world().resource::<SelectionState>();
        assert_eq!(state.selected, None);
        assert!(!state.checkout_open);
        for (part, color) in state.colors.iter() {
            let expected = if part == Part::Laces { HexColor::rgb(255, 0, 0) } else { HexColor::WHITE };
            assert_eq!(color, expected);
        }
        assert_eq!(app.world().resource::<Renders>().0, 3);
    }

    #[test]
    fn test_checkout_round_trip() {
        let mut app = test_app();
        send(&mut app, SelectionCommand::OpenCheckout);
        assert!(app.world().resource::<SelectionState>().checkout_open);
        send(&mut app, SelectionCommand::CloseCheckout);
        assert!(!app.world().resource::<SelectionState>().checkout_open);
    }
}
