pub mod picker_plugin;
pub mod scene_plugin;
pub mod selection_plugin;
pub mod shoe_plugin;
pub mod ui_plugin;
