//! Headless model of the GODZEXMD page.
//!
//! Clicks arrive as [`ClickEvent`]s, are routed through the controller's
//! dispatch table and come back as [`Effect`]s. The effects are folded into a
//! [`UiState`] so the server always knows what the browser is showing, and are
//! replayed by the browser shim onto the real DOM.

pub mod controller;
pub mod controls;
pub mod effects;
pub mod markup;
pub mod state;

pub use controller::{HandlerContext, UiController};
pub use controls::{ClickEvent, Control};
pub use effects::Effect;
pub use markup::PageMarkup;
pub use state::{Display, PanelState, UiState};
