use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::picking::Pickable;
use bevy::prelude::*;

use crate::assets_map::ShoeAssets;
use crate::config::tuning::Tuning;
use crate::configurator::components::AppState;
use crate::configurator::part::Part;
use crate::configurator::state::{SelectionCommand, SelectionState};
use crate::plugins::selection_plugin::ConfiguratorSet;

// ── Colors ───────────────────────────────────────────────────────────

const COLOR_PANEL: Color = Color::srgba(1.0, 1.0, 1.0, 0.92);
const COLOR_BTN: Color = Color::srgb(0.20, 0.52, 0.90);
const COLOR_BTN_HOVER: Color = Color::srgb(0.26, 0.60, 0.98);
const COLOR_BTN_PRESS: Color = Color::srgb(0.14, 0.42, 0.78);
const COLOR_BTN_SUBTLE: Color = Color::srgba(0.0, 0.0, 0.0, 0.0);
const COLOR_BTN_SUBTLE_HOVER: Color = Color::srgba(0.0, 0.0, 0.0, 0.06);
const COLOR_TEXT: Color = Color::srgb(0.10, 0.10, 0.12);
const COLOR_TEXT_DIM: Color = Color::srgb(0.45, 0.45, 0.50);
const COLOR_TEXT_ON_BTN: Color = Color::WHITE;
const COLOR_BACKDROP: Color = Color::srgba(0.0, 0.0, 0.0, 0.3);
const COLOR_ERROR: Color = Color::srgb(0.80, 0.15, 0.15);

const DRAWER_WIDTH: f32 = 380.0;

// ── Plugin ───────────────────────────────────────────────────────────

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_ui);
        app.add_systems(
            Update,
            (footer_button_system, drawer_button_system, close_drawer_on_escape)
                .in_set(ConfiguratorSet::Input),
        );
        app.add_systems(
            Update,
            (render_item_list, render_picker_panel, render_drawer)
                .in_set(ConfiguratorSet::Present)
                .run_if(resource_changed::<SelectionState>),
        );
        app.add_systems(Update, slide_drawer.after(ConfiguratorSet::Present));
        app.add_systems(OnEnter(AppState::Ready), hide_loading_overlay);
        app.add_systems(OnEnter(AppState::Failed), show_loading_error);

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(Update, hover_label_system.in_set(ConfiguratorSet::Present));
    }
}

// ── Marker components ────────────────────────────────────────────────

/// One item list row. Rows for unselected parts stay spawned with
/// `Display::None`.
#[derive(Component, Debug, Clone, Copy)]
pub struct ItemRow(pub Part);

#[derive(Component, Debug, Clone, Copy)]
pub struct ItemSwatch(pub Part);

/// Container of the color picker widget; shown only while a part is selected.
#[derive(Component)]
pub struct PickerPanel;

#[derive(Component)]
enum FooterButton {
    AddToCart,
}

#[derive(Component, Clone, Copy, PartialEq)]
enum DrawerButton {
    Confirm,
    Cancel,
    Backdrop,
}

#[derive(Component)]
struct CheckoutDrawer;

/// Fraction of the drawer still off-screen: 1 fully hidden, 0 fully in.
#[derive(Component)]
struct DrawerSlide(f32);

#[derive(Component)]
struct DrawerBackdrop;

#[derive(Component)]
struct LoadingOverlay;

#[derive(Component)]
struct LoadingText;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Component)]
struct HoverLabel;

// ── Projections of the store ─────────────────────────────────────────

pub fn row_display(row: Part, selected: Option<Part>) -> Display {
    if selected == Some(row) { Display::Flex } else { Display::None }
}

pub fn panel_display(selected: Option<Part>) -> Display {
    if selected.is_some() { Display::Flex } else { Display::None }
}

pub fn drawer_display(checkout_open: bool) -> Display {
    if checkout_open { Display::Flex } else { Display::None }
}

/// Moves the drawer's hidden fraction toward 0 while open.
pub fn slide_toward(hidden: f32, speed: f32, dt: f32) -> f32 {
    (hidden - speed * dt).max(0.0)
}

// ── Setup ────────────────────────────────────────────────────────────

fn setup_ui(mut commands: Commands, tuning: Res<Tuning>, state: Res<SelectionState>) {
    // Header: item list on the left, color picker on the right.
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                left: Val::Px(0.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::FlexStart,
                padding: UiRect::all(Val::Px(24.0)),
                ..default()
            },
            Pickable::IGNORE,
        ))
        .with_children(|header| {
            header
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        ..default()
                    },
                    Pickable::IGNORE,
                ))
                .with_children(|list| {
                    for part in Part::ALL {
                        spawn_item_row(list, part, &state);
                    }
                });

            header.spawn((
                PickerPanel,
                Node {
                    display: panel_display(state.selected),
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(12.0)),
                    row_gap: Val::Px(10.0),
                    border_radius: BorderRadius::all(Val::Px(10.0)),
                    ..default()
                },
                BackgroundColor(COLOR_PANEL),
            ));
        });

    // Footer: product label and the add-to-cart button.
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(0.0),
                left: Val::Px(0.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                padding: UiRect::axes(Val::Px(32.0), Val::Px(20.0)),
                ..default()
            },
            BackgroundColor(COLOR_PANEL),
        ))
        .with_children(|footer| {
            footer
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    ..default()
                })
                .with_children(|label| {
                    label.spawn((
                        Text::new(tuning.product_name.clone()),
                        TextFont { font_size: 28.0, ..default() },
                        TextColor(COLOR_TEXT),
                    ));
                    label.spawn((
                        Text::new(tuning.product_tagline.clone()),
                        TextFont { font_size: 14.0, ..default() },
                        TextColor(COLOR_TEXT_DIM),
                    ));
                });
            spawn_button(footer, "Add to cart", FooterButton::AddToCart, COLOR_BTN, COLOR_TEXT_ON_BTN, 220.0);
        });

    // Checkout drawer over a click-to-close backdrop.
    commands.spawn((
        DrawerBackdrop,
        DrawerButton::Backdrop,
        Button,
        Node {
            display: drawer_display(state.checkout_open),
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(COLOR_BACKDROP),
        GlobalZIndex(10),
    ));
    commands
        .spawn((
            CheckoutDrawer,
            DrawerSlide(1.0),
            Node {
                display: drawer_display(state.checkout_open),
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                right: Val::Px(-DRAWER_WIDTH),
                width: Val::Px(DRAWER_WIDTH),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(24.0)),
                ..default()
            },
            BackgroundColor(Color::WHITE),
            GlobalZIndex(11),
        ))
        .with_children(|drawer| {
            drawer.spawn((
                Text::new("Check Out"),
                TextFont { font_size: 24.0, ..default() },
                TextColor(COLOR_TEXT),
            ));
            // body intentionally empty: no order data exists
            drawer.spawn(Node { flex_grow: 1.0, ..default() });
            drawer
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    justify_content: JustifyContent::FlexEnd,
                    column_gap: Val::Px(10.0),
                    ..default()
                })
                .with_children(|row| {
                    spawn_button(row, "Confirm", DrawerButton::Confirm, COLOR_BTN, COLOR_TEXT_ON_BTN, 110.0);
                    spawn_button(row, "Cancel", DrawerButton::Cancel, COLOR_BTN_SUBTLE, COLOR_TEXT, 110.0);
                });
        });

    // Loading / error overlay.
    commands
        .spawn((
            LoadingOverlay,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            Pickable::IGNORE,
        ))
        .with_children(|overlay| {
            overlay.spawn((
                LoadingText,
                Text::new("Loading..."),
                TextFont { font_size: 18.0, ..default() },
                TextColor(COLOR_TEXT_DIM),
                Pickable::IGNORE,
            ));
        });

    #[cfg(not(target_arch = "wasm32"))]
    commands.spawn((
        HoverLabel,
        Text::new(""),
        TextFont { font_size: 12.0, ..default() },
        TextColor(Color::BLACK),
        Node {
            display: Display::None,
            position_type: PositionType::Absolute,
            ..default()
        },
        Pickable::IGNORE,
        GlobalZIndex(20),
    ));
}

fn spawn_item_row(list: &mut ChildSpawnerCommands, part: Part, state: &SelectionState) {
    list.spawn((
        ItemRow(part),
        Node {
            display: row_display(part, state.selected),
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            column_gap: Val::Px(14.0),
            ..default()
        },
        Pickable::IGNORE,
    ))
    .with_children(|row| {
        row.spawn((
            Text::new(part.label()),
            TextFont { font_size: 32.0, ..default() },
            TextColor(COLOR_TEXT),
            Pickable::IGNORE,
        ));
        row.spawn((
            ItemSwatch(part),
            Node {
                width: Val::Px(28.0),
                height: Val::Px(28.0),
                border: UiRect::all(Val::Px(1.0)),
                border_radius: BorderRadius::MAX,
                ..default()
            },
            BorderColor::all(COLOR_TEXT_DIM),
            BackgroundColor(state.colors.get(part).to_color()),
            Pickable::IGNORE,
        ));
    });
}

fn spawn_button<C: Component>(
    parent: &mut ChildSpawnerCommands,
    label: &str,
    marker: C,
    bg: Color,
    fg: Color,
    width: f32,
) {
    parent
        .spawn((
            marker,
            Button,
            Node {
                width: Val::Px(width),
                height: Val::Px(42.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border_radius: BorderRadius::all(Val::Px(6.0)),
                ..default()
            },
            BackgroundColor(bg),
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont { font_size: 16.0, ..default() },
                TextColor(fg),
            ));
        });
}

// ── Input ────────────────────────────────────────────────────────────

fn footer_button_system(
    mut q: Query<(&Interaction, &FooterButton, &mut BackgroundColor), Changed<Interaction>>,
    mut writer: MessageWriter<SelectionCommand>,
) {
    for (interaction, button, mut bg) in &mut q {
        match (button, interaction) {
            (FooterButton::AddToCart, Interaction::Pressed) => {
                *bg = BackgroundColor(COLOR_BTN_PRESS);
                writer.write(SelectionCommand::OpenCheckout);
            }
            (_, Interaction::Hovered) => *bg = BackgroundColor(COLOR_BTN_HOVER),
            (_, Interaction::None) => *bg = BackgroundColor(COLOR_BTN),
        }
    }
}

/// Confirm, cancel and the backdrop all just close the drawer.
fn drawer_button_system(
    mut q: Query<(&Interaction, &DrawerButton, &mut BackgroundColor), Changed<Interaction>>,
    mut writer: MessageWriter<SelectionCommand>,
) {
    for (interaction, button, mut bg) in &mut q {
        if *interaction == Interaction::Pressed {
            writer.write(SelectionCommand::CloseCheckout);
        }
        let color = match (button, interaction) {
            (DrawerButton::Backdrop, _) => continue,
            (DrawerButton::Confirm, Interaction::Pressed) => COLOR_BTN_PRESS,
            (DrawerButton::Confirm, Interaction::Hovered) => COLOR_BTN_HOVER,
            (DrawerButton::Confirm, Interaction::None) => COLOR_BTN,
            (DrawerButton::Cancel, Interaction::None) => COLOR_BTN_SUBTLE,
            (DrawerButton::Cancel, _) => COLOR_BTN_SUBTLE_HOVER,
        };
        *bg = BackgroundColor(color);
    }
}

fn close_drawer_on_escape(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<SelectionState>,
    mut writer: MessageWriter<SelectionCommand>,
) {
    if state.checkout_open && keys.just_pressed(KeyCode::Escape) {
        writer.write(SelectionCommand::CloseCheckout);
    }
}

// ── Present ──────────────────────────────────────────────────────────

fn render_item_list(
    state: Res<SelectionState>,
    mut rows: Query<(&ItemRow, &mut Node)>,
    mut swatches: Query<(&ItemSwatch, &mut BackgroundColor)>,
) {
    for (row, mut node) in &mut rows {
        node.display = row_display(row.0, state.selected);
    }
    for (swatch, mut bg) in &mut swatches {
        *bg = BackgroundColor(state.colors.get(swatch.0).to_color());
    }
}

fn render_picker_panel(state: Res<SelectionState>, mut panels: Query<&mut Node, With<PickerPanel>>) {
    for mut node in &mut panels {
        node.display = panel_display(state.selected);
    }
}

fn render_drawer(
    state: Res<SelectionState>,
    mut drawer: Query<(&mut Node, &mut DrawerSlide), (With<CheckoutDrawer>, Without<DrawerBackdrop>)>,
    mut backdrop: Query<&mut Node, (With<DrawerBackdrop>, Without<CheckoutDrawer>)>,
) {
    let display = drawer_display(state.checkout_open);
    for (mut node, mut slide) in &mut drawer {
        if node.display != display {
            node.display = display;
            // every opening slides in from the edge
            slide.0 = 1.0;
            node.right = Val::Px(-DRAWER_WIDTH);
        }
    }
    for mut node in &mut backdrop {
        node.display = display;
    }
}

fn slide_drawer(
    time: Res<Time>,
    tuning: Res<Tuning>,
    mut drawer: Query<(&mut Node, &mut DrawerSlide), With<CheckoutDrawer>>,
) {
    for (mut node, mut slide) in &mut drawer {
        if node.display == Display::None || slide.0 <= 0.0 {
            continue;
        }
        slide.0 = slide_toward(slide.0, tuning.drawer_slide_speed, time.delta_secs());
        node.right = Val::Px(-DRAWER_WIDTH * slide.0);
    }
}

fn hide_loading_overlay(mut overlays: Query<&mut Node, With<LoadingOverlay>>) {
    for mut node in &mut overlays {
        node.display = Display::None;
    }
}

fn show_loading_error(
    shoe: Option<Res<ShoeAssets>>,
    mut texts: Query<(&mut Text, &mut TextColor), With<LoadingText>>,
) {
    let message = shoe
        .and_then(|s| s.error.as_ref().map(|e| e.to_string()))
        .unwrap_or_else(|| "The shoe model could not be loaded".into());
    for (mut text, mut color) in &mut texts {
        **text = message.clone();
        *color = TextColor(COLOR_ERROR);
    }
}

/// Native windows cannot show the SVG cursor label, so the hovered part's
/// name follows the pointer as a UI label instead.
#[cfg(not(target_arch = "wasm32"))]
fn hover_label_system(
    hover: Res<crate::configurator::hover::HoverState>,
    windows: Query<&Window, With<bevy::window::PrimaryWindow>>,
    mut labels: Query<(&mut Node, &mut Text), With<HoverLabel>>,
) {
    let position = windows.iter().next().and_then(|w| w.cursor_position());
    for (mut node, mut text) in &mut labels {
        match (hover.hovered, position) {
            (Some(part), Some(pos)) => {
                node.display = Display::Flex;
                node.left = Val::Px(pos.x + 33.0);
                node.top = Val::Px(pos.y + 50.0);
                if text.as_str() != part.name() {
                    **text = part.name().to_string();
                }
            }
            _ => node.display = Display::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurator::color::HexColor;
    use crate::plugins::selection_plugin::SelectionPlugin;

    #[test]
    fn test_exactly_one_row_visible_per_selection() {
        for selected in Part::ALL {
            let visible: Vec<_> = Part::ALL
                .into_iter()
                .filter(|&p| row_display(p, Some(selected)) == Display::Flex)
                .collect();
            assert_eq!(visible, vec![selected]);
        }
        assert!(Part::ALL.into_iter().all(|p| row_display(p, None) == Display::None));
    }

    #[test]
    fn test_panel_and_drawer_visibility() {
        assert_eq!(panel_display(None), Display::None);
        assert_eq!(panel_display(Some(Part::Band)), Display::Flex);
        assert_eq!(drawer_display(true), Display::Flex);
        assert_eq!(drawer_display(false), Display::None);
    }

    #[test]
    fn test_slide_converges_and_stops_at_zero() {
        let mut hidden = 1.0;
        for _ in 0..30 {
            hidden = slide_toward(hidden, 4.0, 1.0 / 60.0);
        }
        assert_eq!(hidden, 0.0);
        assert_eq!(slide_toward(0.0, 4.0, 0.5), 0.0);
    }

    fn ui_app() -> App {
        let mut app = App::new();
        app.add_plugins(SelectionPlugin);
        app.insert_resource(Tuning::default());
        app.insert_resource(ButtonInput::<KeyCode>::default());
        app.add_systems(Startup, setup_ui);
        app.add_systems(
            Update,
            (footer_button_system, drawer_button_system, close_drawer_on_escape)
                .in_set(ConfiguratorSet::Input),
        );
        app.add_systems(
            Update,
            (render_item_list, render_picker_panel, render_drawer)
                .in_set(ConfiguratorSet::Present)
                .run_if(resource_changed::<SelectionState>),
        );
        app.update();
        app
    }

    fn send(app: &mut App, command: SelectionCommand) {
        app.world_mut().write_message(command);
        app.update();
    }

    fn visible_rows(app: &mut App) -> Vec<Part> {
        let mut q = app.world_mut().query::<(&ItemRow, &Node)>();
        let mut rows: Vec<_> = q
            .iter(app.world())
            .filter(|(_, node)| node.display != Display::None)
            .map(|(row, _)| row.0)
            .collect();
        rows.sort();
        rows
    }

    fn panel_shown(app: &mut App) -> bool {
        let mut q = app.world_mut().query_filtered::<&Node, With<PickerPanel>>();
        q.single(app.world()).unwrap().display != Display::None
    }

    #[test]
    fn test_rows_stay_spawned_and_follow_selection() {
        let mut app = ui_app();
        let mut q = app.world_mut().query::<&ItemRow>();
        assert_eq!(q.iter(app.world()).count(), Part::COUNT);
        assert!(visible_rows(&mut app).is_empty());
        assert!(!panel_shown(&mut app));

        send(&mut app, SelectionCommand::Select(Part::Laces));
        assert_eq!(visible_rows(&mut app), vec![Part::Laces]);
        assert!(panel_shown(&mut app));

        send(&mut app, SelectionCommand::Select(Part::Patch));
        assert_eq!(visible_rows(&mut app), vec![Part::Patch]);

        send(&mut app, SelectionCommand::ClearSelection);
        assert!(visible_rows(&mut app).is_empty());
        assert!(!panel_shown(&mut app));
        let mut q = app.world_mut().query::<&ItemRow>();
        assert_eq!(q.iter(app.world()).count(), Part::COUNT);
    }

    #[test]
    fn test_swatch_tracks_selected_color() {
        let mut app = ui_app();
        send(&mut app, SelectionCommand::Select(Part::Sole));
        send(&mut app, SelectionCommand::SetColor(HexColor::rgb(0, 128, 255)));

        let mut q = app.world_mut().query::<(&ItemSwatch, &BackgroundColor)>();
        for (swatch, bg) in q.iter(app.world()) {
            let expected = if swatch.0 == Part::Sole { HexColor::rgb(0, 128, 255) } else { HexColor::WHITE };
            assert_eq!(bg.0, expected.to_color(), "{}", swatch.0);
        }
    }

    #[test]
    fn test_drawer_opens_and_escape_closes_it() {
        let mut app = ui_app();
        send(&mut app, SelectionCommand::OpenCheckout);
        let mut q = app.world_mut().query_filtered::<&Node, With<CheckoutDrawer>>();
        assert_eq!(q.single(app.world()).unwrap().display, Display::Flex);

        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::Escape);
        app.update();
        // the close command is applied in the same frame it was written
        assert!(!app.world().resource::<SelectionState>().checkout_open);
        let mut q = app.world_mut().query_filtered::<&Node, With<CheckoutDrawer>>();
        assert_eq!(q.single(app.world()).unwrap().display, Display::None);
    }

    fn press_button<C: Component>(app: &mut App, is_target: impl Fn(&C) -> bool) {
        let mut q = app.world_mut().query::<(Entity, &C)>();
        let entity = q
            .iter(app.world())
            .find(|(_, c)| is_target(c))
            .map(|(e, _)| e)
            .expect("button spawned");
        app.world_mut().entity_mut(entity).insert(Interaction::Pressed);
        app.update();
    }

    fn checkout_open(app: &App) -> bool {
        app.world().resource::<SelectionState>().checkout_open
    }

    #[test]
    fn test_add_to_cart_then_confirm_or_cancel_closes() {
        for closer in [DrawerButton::Confirm, DrawerButton::Cancel, DrawerButton::Backdrop] {
            let mut app = ui_app();
            press_button::<FooterButton>(&mut app, |_| true);
            assert!(checkout_open(&app));

            press_button::<DrawerButton>(&mut app, |b| *b == closer);
            assert!(!checkout_open(&app));
        }
    }

    #[test]
    fn test_drawer_buttons_leave_selection_alone() {
        let mut app = ui_app();
        send(&mut app, SelectionCommand::Select(Part::Band));
        press_button::<FooterButton>(&mut app, |_| true);
        press_button::<DrawerButton>(&mut app, |b| *b == DrawerButton::Confirm);
        assert!(!checkout_open(&app));
        assert_eq!(app.world().resource::<SelectionState>().selected, Some(Part::Band));
    }
}
