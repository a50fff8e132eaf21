use color_eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::config::Config;
use crate::store::TableStore;
use crate::tui::Event;

pub mod dialog_layout;

/// A visible piece of the UI.
///
/// Components never own shared table state: every call that needs it is
/// handed a `&TableStore`, and changes go back through the action sender
/// registered with `register_action_handler`.
pub trait Component {
    /// Register the sender used to dispatch actions to the store.
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        let _ = tx;
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        let _ = config;
        Ok(())
    }

    /// Route a terminal event to the key or mouse handler.
    fn handle_events(&mut self, event: Option<Event>, store: &TableStore) -> Result<Option<Action>> {
        let action = match event {
            Some(Event::Key(key)) => self.handle_key_event(key, store)?,
            Some(Event::Mouse(mouse)) => self.handle_mouse_event(mouse, store)?,
            _ => None,
        };
        Ok(action)
    }

    fn handle_key_event(&mut self, key: KeyEvent, store: &TableStore) -> Result<Option<Action>> {
        let _ = (key, store);
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent, store: &TableStore) -> Result<Option<Action>> {
        let _ = (mouse, store);
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, store: &TableStore) -> Result<()>;
}
