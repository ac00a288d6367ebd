pub mod color;
pub mod components;
pub mod cursor;
pub mod error;
pub mod hover;
pub mod idle;
pub mod orbit;
pub mod part;
pub mod picker;
pub mod state;
