//! FilterPopover: toolbar button that opens a popover listing one FilterRow per filter
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::{
    Block, BorderType, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
    Widget, Wrap,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::action::Action;
use crate::components::Component;
use crate::components::dialog_layout::{below, instructions_height, split_dialog_area};
use crate::config::{Config, Mode};
use crate::dialog::filter_row::{FilterRow, RowField, RowUpdate, RowView};
use crate::filter::{FilterCategory, FilterEntry, FilterList, FilterParameter, NumberInput};
use crate::store::TableStore;

const POPOVER_WIDTH: u16 = 72;
const ADD_FILTER_LABEL: &str = "[+ Add filter]";

/// What has keyboard focus inside the open popover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopoverFocus {
    Field(RowField),
    AddFilter,
}

impl Default for PopoverFocus {
    fn default() -> Self {
        PopoverFocus::Field(RowField::Column)
    }
}

/// Where a click landed relative to the popover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Inside the open popover body; absorbed
    Body,
    /// On the trigger button; toggles
    Root,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HitTarget {
    Row { index: usize, field: RowField },
    AddFilter,
}

/// Edit buffer for the focused parameter control
#[derive(Debug, Clone, PartialEq)]
enum ParamBuffer {
    Number(NumberInput),
    Text(String),
}

impl ParamBuffer {
    fn for_entry(entry: &FilterEntry) -> Self {
        match (entry.category, &entry.parameter) {
            (FilterCategory::String, FilterParameter::Text(text)) => ParamBuffer::Text(text.clone()),
            (FilterCategory::String, FilterParameter::Number(_)) => ParamBuffer::Text(String::new()),
            (FilterCategory::Number, FilterParameter::Number(n)) => ParamBuffer::Number(NumberInput::new(n.to_string())),
            (FilterCategory::Number, FilterParameter::Text(_)) => ParamBuffer::Number(NumberInput::default()),
        }
    }

    fn text(&self) -> &str {
        match self {
            ParamBuffer::Number(input) => input.text(),
            ParamBuffer::Text(text) => text,
        }
    }
}

#[derive(Debug)]
pub struct FilterPopover {
    pub is_popover_open: bool,
    pub selected_row: usize,
    pub focus: PopoverFocus,
    pub scroll_offset: usize,
    pub show_instructions: bool,
    pub config: Config,
    param_edit: Option<(usize, ParamBuffer)>,
    action_tx: Option<UnboundedSender<Action>>,
    root_area: Rect,
    body_area: Option<Rect>,
    hit_targets: Vec<(Rect, HitTarget)>,
}

impl Default for FilterPopover {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterPopover {
    pub fn new() -> Self {
        Self {
            is_popover_open: false,
            selected_row: 0,
            focus: PopoverFocus::default(),
            scroll_offset: 0,
            show_instructions: true,
            config: Config::default(),
            param_edit: None,
            action_tx: None,
            root_area: Rect::default(),
            body_area: None,
            hit_targets: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_popover_open
    }

    pub fn toggle(&mut self) {
        self.is_popover_open = !self.is_popover_open;
        self.param_edit = None;
        debug!("filter popover {}", if self.is_popover_open { "opened" } else { "closed" });
    }

    pub fn close(&mut self) {
        if self.is_popover_open {
            self.toggle();
        }
    }

    /// True while typed letters go into a text parameter rather than to key bindings
    pub fn captures_text(&self) -> bool {
        self.is_popover_open
            && self.focus == PopoverFocus::Field(RowField::Parameter)
            && matches!(self.param_edit, Some((_, ParamBuffer::Text(_))))
    }

    /// Classify a click. The popover body is checked before the trigger so
    /// clicks on controls inside it never close it.
    pub fn click_target(&self, column: u16, row: u16) -> ClickTarget {
        let position = Position::new(column, row);
        if let Some(body) = self.body_area {
            if self.is_popover_open && body.contains(position) {
                return ClickTarget::Body;
            }
        }
        if self.root_area.contains(position) {
            return ClickTarget::Root;
        }
        ClickTarget::Outside
    }

    fn dispatch(&self, action: Action) -> Result<()> {
        let tx = self.action_tx.as_ref().ok_or_else(|| eyre!("filter popover has no action handler"))?;
        tx.send(action)?;
        Ok(())
    }

    /// Replace the entry at `index` and publish the new list
    pub fn handle_update_filter(&self, filter: FilterEntry, index: usize, store: &TableStore) -> Result<FilterList> {
        let filters = store.filters().replaced(index, filter)?;
        self.dispatch(Action::UpdateFilters { filters: filters.clone() })?;
        Ok(filters)
    }

    /// Append a placeholder row and focus it
    pub fn add_filter(&mut self, store: &TableStore) -> Result<FilterList> {
        let filters = store.filters().appended(FilterEntry::placeholder(store.columns()));
        self.dispatch(Action::UpdateFilters { filters: filters.clone() })?;
        self.selected_row = filters.len() - 1;
        self.focus = PopoverFocus::Field(RowField::Column);
        self.param_edit = None;
        Ok(filters)
    }

    pub fn remove_filter(&mut self, index: usize, store: &TableStore) -> Result<FilterList> {
        let filters = store.filters().removed(index)?;
        self.dispatch(Action::UpdateFilters { filters: filters.clone() })?;
        self.param_edit = None;
        self.normalize_focus(filters.len());
        Ok(filters)
    }

    fn apply_row_update(&self, update: RowUpdate, store: &TableStore) {
        if let Err(e) = self.handle_update_filter(update.filter, update.index, store) {
            warn!("filter update dropped: {e}");
        }
    }

    /// Keep the selection and focus on controls that exist for `len` rows
    fn normalize_focus(&mut self, len: usize) {
        if len == 0 {
            self.selected_row = 0;
            self.focus = PopoverFocus::AddFilter;
            return;
        }
        self.selected_row = self.selected_row.min(len - 1);
        match self.focus {
            PopoverFocus::Field(RowField::Combiner) if self.selected_row == 0 => {
                self.focus = PopoverFocus::Field(RowField::Column);
            }
            _ => {}
        }
    }

    /// Start or drop the parameter buffer to match the current focus
    fn sync_param_edit(&mut self, store: &TableStore) {
        if self.focus != PopoverFocus::Field(RowField::Parameter) {
            self.param_edit = None;
            return;
        }
        let Some(entry) = store.filters().get(self.selected_row) else {
            self.param_edit = None;
            return;
        };
        let stale = !matches!(&self.param_edit, Some((row, _)) if *row == self.selected_row);
        if stale {
            self.param_edit = Some((self.selected_row, ParamBuffer::for_entry(entry)));
        }
    }

    fn focus_order(&self, len: usize) -> Vec<PopoverFocus> {
        let mut order: Vec<PopoverFocus> = if len == 0 {
            Vec::new()
        } else {
            RowField::focus_order(self.selected_row).iter().copied().map(PopoverFocus::Field).collect()
        };
        order.push(PopoverFocus::AddFilter);
        order
    }

    fn move_focus(&mut self, forward: bool, store: &TableStore) {
        let order = self.focus_order(store.filters().len());
        let current = order.iter().position(|f| *f == self.focus);
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
            (None, _) => 0,
        };
        self.focus = order[next];
        self.sync_param_edit(store);
    }

    fn move_selection(&mut self, down: bool, store: &TableStore) {
        let len = store.filters().len();
        if len == 0 {
            return;
        }
        self.selected_row = if down {
            (self.selected_row + 1) % len
        } else if self.selected_row == 0 {
            len - 1
        } else {
            self.selected_row - 1
        };
        if self.focus == PopoverFocus::AddFilter {
            self.focus = PopoverFocus::default();
        }
        self.normalize_focus(len);
        self.sync_param_edit(store);
    }

    fn cycle_focused(&self, forward: bool, store: &TableStore) {
        let PopoverFocus::Field(field) = self.focus else {
            return;
        };
        let Some(entry) = store.filters().get(self.selected_row) else {
            return;
        };
        let row = FilterRow::new(self.selected_row, entry, store.columns());
        if let Some(update) = row.cycle(field, forward) {
            self.apply_row_update(update, store);
        }
    }

    /// Push the parameter buffer through the row. Rejected values are dropped.
    fn commit_param(&self, store: &TableStore) {
        let Some((index, buffer)) = &self.param_edit else {
            return;
        };
        let Some(entry) = store.filters().get(*index) else {
            return;
        };
        let row = FilterRow::new(*index, entry, store.columns());
        let update = match buffer {
            ParamBuffer::Number(input) => row.handle_param_change(input.value()),
            ParamBuffer::Text(text) => row.handle_text_param_change(text),
        };
        match update {
            Some(update) => self.apply_row_update(update, store),
            None => debug!("parameter '{}' not applied to {}", buffer.text(), row.id()),
        }
    }

    /// Type into the focused parameter. Returns false when the key is not taken.
    fn type_into_parameter(&mut self, c: char, store: &TableStore) -> bool {
        if self.focus != PopoverFocus::Field(RowField::Parameter) {
            return false;
        }
        let Some((_, buffer)) = self.param_edit.as_mut() else {
            return false;
        };
        let taken = match buffer {
            ParamBuffer::Number(input) => input.push(c),
            ParamBuffer::Text(text) => {
                text.push(c);
                true
            }
        };
        if taken {
            self.commit_param(store);
        }
        taken
    }

    fn backspace_parameter(&mut self, store: &TableStore) {
        let Some((_, buffer)) = self.param_edit.as_mut() else {
            return;
        };
        match buffer {
            ParamBuffer::Number(input) => {
                input.pop();
            }
            ParamBuffer::Text(text) => {
                text.pop();
            }
        }
        self.commit_param(store);
    }

    fn activate(&mut self, store: &TableStore) -> Result<()> {
        match self.focus {
            PopoverFocus::Field(RowField::Remove) => {
                self.remove_filter(self.selected_row, store)?;
            }
            PopoverFocus::AddFilter => {
                self.add_filter(store)?;
            }
            PopoverFocus::Field(_) => {}
        }
        Ok(())
    }

    fn report(result: Result<FilterList>) {
        if let Err(e) = result {
            warn!("filter edit failed: {e}");
        }
    }

    /// Build instructions string from configurable actions
    fn build_instructions_from_config(&self) -> String {
        self.config.actions_to_instructions(&[
            (Mode::Global, Action::Tab),
            (Mode::Global, Action::Right),
            (Mode::Global, Action::Enter),
            (Mode::FilterPopover, Action::AddFilter),
            (Mode::FilterPopover, Action::RemoveFilter),
            (Mode::Global, Action::Escape),
        ])
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, store: &TableStore) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let global = self.config.action_for_key(Mode::Global, key);
        if !self.is_popover_open {
            if global == Some(Action::TogglePopover) {
                self.toggle();
                self.normalize_focus(store.filters().len());
                self.sync_param_edit(store);
            }
            return None;
        }

        self.normalize_focus(store.filters().len());
        self.sync_param_edit(store);

        // Parameter typing comes before bindings so bound letters still reach a text field
        if let KeyCode::Char(c) = key.code {
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                && self.type_into_parameter(c, store)
            {
                return None;
            }
        }

        if let Some(action) = global {
            match action {
                Action::Escape | Action::TogglePopover => self.close(),
                Action::Up => self.move_selection(false, store),
                Action::Down => self.move_selection(true, store),
                Action::Tab => self.move_focus(true, store),
                Action::BackTab => self.move_focus(false, store),
                Action::Left => self.cycle_focused(false, store),
                Action::Right => self.cycle_focused(true, store),
                Action::Backspace => self.backspace_parameter(store),
                Action::ToggleInstructions => self.show_instructions = !self.show_instructions,
                Action::Enter => {
                    if let Err(e) = self.activate(store) {
                        warn!("filter edit failed: {e}");
                    }
                }
                // the quit key is inert while open; ctrl-c is handled by the event loop
                Action::Quit => debug!("quit key ignored while the filter popover is open"),
                other => return Some(other),
            }
            return None;
        }

        if let Some(action) = self.config.action_for_key(Mode::FilterPopover, key) {
            match action {
                Action::AddFilter => Self::report(self.add_filter(store)),
                Action::RemoveFilter if !store.filters().is_empty() => {
                    let index = self.selected_row;
                    Self::report(self.remove_filter(index, store));
                }
                _ => {}
            }
        }
        None
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent, store: &TableStore) -> Option<Action> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        match self.click_target(mouse.column, mouse.row) {
            ClickTarget::Body => self.click_body(Position::new(mouse.column, mouse.row), store),
            ClickTarget::Root => {
                self.toggle();
                self.normalize_focus(store.filters().len());
                self.sync_param_edit(store);
            }
            ClickTarget::Outside => {}
        }
        None
    }

    fn click_body(&mut self, position: Position, store: &TableStore) {
        let Some(target) = self
            .hit_targets
            .iter()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, target)| *target)
        else {
            return;
        };
        match target {
            HitTarget::AddFilter => {
                self.focus = PopoverFocus::AddFilter;
                Self::report(self.add_filter(store));
            }
            HitTarget::Row { index, field } => {
                let already_focused = self.selected_row == index && self.focus == PopoverFocus::Field(field);
                self.selected_row = index;
                self.focus = PopoverFocus::Field(field);
                if field == RowField::Remove {
                    Self::report(self.remove_filter(index, store));
                } else if field.is_select() && already_focused {
                    self.cycle_focused(true, store);
                }
                self.sync_param_edit(store);
            }
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, store: &TableStore) {
        let filters = store.filters();
        let label = if filters.is_empty() {
            " ▼ Filter ".to_string()
        } else {
            format!(" ▼ Filter ({}) ", filters.len())
        };
        let button_area = Rect {
            width: (label.chars().count() as u16 + 2).min(area.width),
            height: 3.min(area.height),
            ..area
        };
        let border_style = if self.is_popover_open {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        Paragraph::new(label)
            .style(self.config.style_for(Mode::FilterPopover, "button", Style::default().add_modifier(Modifier::BOLD)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border_style),
            )
            .render(button_area, buf);

        self.root_area = button_area;
        self.body_area = None;
        self.hit_targets.clear();
        if !self.is_popover_open {
            return;
        }

        self.normalize_focus(filters.len());
        self.sync_param_edit(store);

        let instructions = self.build_instructions_from_config();
        let width = POPOVER_WIDTH.min(area.width);
        let instructions_rows = if self.show_instructions {
            instructions_height(width.saturating_sub(2), &instructions)
        } else {
            0
        };
        let row_count = u16::try_from(filters.len().max(1)).unwrap_or(u16::MAX);
        let height = row_count.saturating_add(4).saturating_add(instructions_rows);
        let popover_area = below(button_area, area, width, height);
        if popover_area.width < 4 || popover_area.height < 3 {
            return;
        }

        Clear.render(popover_area, buf);
        let outer_block = Block::default()
            .title("Filters")
            .borders(Borders::ALL)
            .border_type(BorderType::Double);
        let inner_area = outer_block.inner(popover_area);
        outer_block.render(popover_area, buf);
        self.body_area = Some(popover_area);
        self.root_area = button_area.union(popover_area);

        let layout = split_dialog_area(inner_area, self.show_instructions, Some(instructions.as_str()));
        let content_area = layout.content_area;

        let focus_style = self.config.style_for(
            Mode::FilterPopover,
            "focused",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ).add_modifier(Modifier::BOLD);
        let placeholder_style = self.config.style_for(
            Mode::FilterPopover,
            "placeholder",
            Style::default().fg(Color::DarkGray),
        );

        // rows fill everything above a spacer line and the add button
        let visible_rows = content_area.height.saturating_sub(2).max(1) as usize;
        if self.selected_row < self.scroll_offset {
            self.scroll_offset = self.selected_row;
        } else if self.selected_row >= self.scroll_offset + visible_rows {
            self.scroll_offset = self.selected_row + 1 - visible_rows;
        }
        self.scroll_offset = self.scroll_offset.min(filters.len().saturating_sub(visible_rows));

        if filters.is_empty() {
            buf.set_stringn(
                content_area.x + 1,
                content_area.y,
                "No filters applied.",
                content_area.width.saturating_sub(2) as usize,
                Style::default().fg(Color::DarkGray),
            );
        }

        let param_text = self.param_edit.as_ref().map(|(row, buffer)| (*row, buffer.text().to_string()));
        for (offset, (index, entry)) in filters
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_rows)
            .enumerate()
        {
            let row_area = Rect {
                x: content_area.x + 1,
                y: content_area.y + offset as u16,
                width: content_area.width.saturating_sub(2),
                height: 1,
            };
            let focused = match self.focus {
                PopoverFocus::Field(field) if index == self.selected_row => Some(field),
                _ => None,
            };
            let editing = param_text.as_ref().filter(|(row, _)| *row == index).map(|(_, text)| text.as_str());
            let view = RowView {
                focused,
                param_text: editing,
                zebra: index % 2 == 1,
                focus_style,
                placeholder_style,
            };
            let row = FilterRow::new(index, entry, store.columns());
            for (rect, field) in row.render(row_area, buf, view) {
                self.hit_targets.push((rect, HitTarget::Row { index, field }));
            }
        }

        if filters.len() > visible_rows {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            let mut scrollbar_state = ScrollbarState::new(filters.len()).position(self.scroll_offset);
            let bar_area = Rect { height: visible_rows as u16, ..content_area };
            scrollbar.render(bar_area, buf, &mut scrollbar_state);
        }

        if content_area.height >= 2 {
            let add_area = Rect {
                x: content_area.x + 1,
                y: content_area.bottom() - 1,
                width: (ADD_FILTER_LABEL.chars().count() as u16).min(content_area.width.saturating_sub(2)),
                height: 1,
            };
            let add_style = if self.focus == PopoverFocus::AddFilter {
                focus_style
            } else {
                Style::default().fg(Color::Green)
            };
            buf.set_stringn(add_area.x, add_area.y, ADD_FILTER_LABEL, add_area.width as usize, add_style);
            self.hit_targets.push((add_area, HitTarget::AddFilter));
        }

        if let Some(instructions_area) = layout.instructions_area {
            let instructions_paragraph = Paragraph::new(instructions.as_str())
                .block(Block::default().borders(Borders::ALL).title("Instructions"))
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true });
            instructions_paragraph.render(instructions_area, buf);
        }
    }
}

impl Component for FilterPopover {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent, store: &TableStore) -> Result<Option<Action>> {
        Ok(FilterPopover::handle_key_event(self, key, store))
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent, store: &TableStore) -> Result<Option<Action>> {
        Ok(FilterPopover::handle_mouse_event(self, mouse, store))
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, store: &TableStore) -> Result<()> {
        self.render(area, frame.buffer_mut(), store);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{ColumnMeta, Combiner, FilterFunction};
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn store() -> TableStore {
        TableStore::new(
            vec![
                ColumnMeta::new("amount", "Amount"),
                ColumnMeta::new("alias", "Alias").with_category(FilterCategory::String),
            ],
            vec![FilterEntry {
                combiner: Combiner::And,
                category: FilterCategory::Number,
                func_name: FilterFunction::Gt,
                key: "amount".to_string(),
                parameter: FilterParameter::Number(100.0),
            }]
            .into(),
        )
    }

    fn popover(store: &TableStore) -> FilterPopover {
        let mut popover = FilterPopover::new();
        popover.register_config_handler(Config::embedded().unwrap()).unwrap();
        popover.register_action_handler(store.dispatcher()).unwrap();
        popover
    }

    #[test]
    fn toggle_key_opens_and_escape_closes() {
        let store = store();
        let mut popover = popover(&store);
        assert!(!popover.is_open());
        popover.handle_key_event(key(KeyCode::Char('f')), &store);
        assert!(popover.is_open());
        popover.handle_key_event(key(KeyCode::Esc), &store);
        assert!(!popover.is_open());
    }

    #[test]
    fn edits_without_handler_are_errors() {
        let store = store();
        let popover = FilterPopover::new();
        let entry = store.filters()[0].clone();
        assert!(popover.handle_update_filter(entry, 0, &store).is_err());
    }

    #[test]
    fn update_out_of_range_is_not_dispatched() {
        let mut store = store();
        let popover = popover(&store);
        let entry = store.filters()[0].clone();
        assert!(popover.handle_update_filter(entry, 5, &store).is_err());
        assert_eq!(store.process_pending(), 0);
    }

    #[test]
    fn tab_order_skips_combiner_on_first_row() {
        let store = store();
        let mut popover = popover(&store);
        popover.handle_key_event(key(KeyCode::Char('f')), &store);
        assert_eq!(popover.focus, PopoverFocus::Field(RowField::Column));
        popover.handle_key_event(key(KeyCode::BackTab), &store);
        assert_eq!(popover.focus, PopoverFocus::AddFilter);
        popover.handle_key_event(key(KeyCode::Tab), &store);
        assert_eq!(popover.focus, PopoverFocus::Field(RowField::Column));
    }

    #[test]
    fn typing_a_number_dispatches_each_accepted_value() {
        let mut store = store();
        let mut popover = popover(&store);
        popover.handle_key_event(key(KeyCode::Char('f')), &store);
        popover.handle_key_event(key(KeyCode::Tab), &store);
        popover.handle_key_event(key(KeyCode::Tab), &store);
        assert_eq!(popover.focus, PopoverFocus::Field(RowField::Parameter));

        popover.handle_key_event(key(KeyCode::Char(',')), &store);
        store.process_pending();
        popover.handle_key_event(key(KeyCode::Char('5')), &store);
        store.process_pending();
        assert_eq!(store.filters()[0].parameter, FilterParameter::Number(1005.0));

        // letters are not numeric input and 'x' is not bound
        popover.handle_key_event(key(KeyCode::Char('x')), &store);
        assert_eq!(store.process_pending(), 0);
    }

    #[test]
    fn backspacing_to_zero_keeps_last_value() {
        let mut store = store();
        let mut popover = popover(&store);
        popover.handle_key_event(key(KeyCode::Char('f')), &store);
        popover.handle_key_event(key(KeyCode::Tab), &store);
        popover.handle_key_event(key(KeyCode::Tab), &store);
        // "100" -> "10" -> "1" -> ""
        for _ in 0..3 {
            popover.handle_key_event(key(KeyCode::Backspace), &store);
            store.process_pending();
        }
        assert_eq!(store.filters()[0].parameter, FilterParameter::Number(1.0));
    }

    #[test]
    fn add_and_remove_through_bindings() {
        let mut store = store();
        let mut popover = popover(&store);
        popover.handle_key_event(key(KeyCode::Char('f')), &store);
        popover.handle_key_event(key(KeyCode::Char('a')), &store);
        store.process_pending();
        assert_eq!(store.filters().len(), 2);
        assert_eq!(popover.selected_row, 1);
        // placeholder takes the first column by label
        assert_eq!(store.filters()[1].key, "alias");
        assert_eq!(store.filters()[1].category, FilterCategory::String);

        popover.handle_key_event(key(KeyCode::Char('d')), &store);
        store.process_pending();
        assert_eq!(store.filters().len(), 1);
        assert_eq!(popover.selected_row, 0);
    }

    #[test]
    fn closed_popover_only_reacts_to_toggle() {
        let mut store = store();
        let mut popover = popover(&store);
        popover.handle_key_event(key(KeyCode::Char('a')), &store);
        assert_eq!(store.process_pending(), 0);
        assert_eq!(popover.handle_key_event(key(KeyCode::Char('q')), &store), None);
    }

    #[test]
    fn quit_key_is_swallowed_while_open() {
        let store = store();
        let mut popover = popover(&store);
        popover.handle_key_event(key(KeyCode::Char('f')), &store);
        assert_eq!(popover.handle_key_event(key(KeyCode::Char('q')), &store), None);
        // also while a numeric parameter has focus
        popover.handle_key_event(key(KeyCode::Tab), &store);
        popover.handle_key_event(key(KeyCode::Tab), &store);
        assert_eq!(popover.focus, PopoverFocus::Field(RowField::Parameter));
        assert_eq!(popover.handle_key_event(key(KeyCode::Char('q')), &store), None);
        assert!(popover.is_open());
    }

    #[test]
    fn number_row_with_text_parameter_starts_an_empty_buffer() {
        let mut store = TableStore::new(
            vec![ColumnMeta::new("amount", "Amount")],
            vec![FilterEntry {
                combiner: Combiner::And,
                category: FilterCategory::Number,
                func_name: FilterFunction::Gt,
                key: "amount".to_string(),
                parameter: FilterParameter::Text("abc".to_string()),
            }]
            .into(),
        );
        let mut popover = popover(&store);
        popover.handle_key_event(key(KeyCode::Char('f')), &store);
        popover.handle_key_event(key(KeyCode::Tab), &store);
        popover.handle_key_event(key(KeyCode::Tab), &store);
        popover.handle_key_event(key(KeyCode::Char('7')), &store);
        assert_eq!(store.process_pending(), 1);
        assert_eq!(store.filters()[0].parameter, FilterParameter::Number(7.0));
    }

    #[test]
    fn very_long_lists_render_clamped() {
        let entry = store().filters()[0].clone();
        let store = TableStore::new(
            vec![ColumnMeta::new("amount", "Amount")],
            vec![entry; usize::from(u16::MAX) + 10].into(),
        );
        let mut popover = popover(&store);
        popover.toggle();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        popover.render(area, &mut buf, &store);
        assert_eq!(popover.click_target(5, 23), ClickTarget::Body);
    }

    #[test]
    fn click_classification_prefers_body() {
        let store = store();
        let mut popover = popover(&store);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        popover.render(area, &mut buf, &store);
        assert_eq!(popover.click_target(1, 1), ClickTarget::Root);
        assert_eq!(popover.click_target(10, 10), ClickTarget::Outside);

        popover.toggle();
        popover.render(area, &mut buf, &store);
        assert_eq!(popover.click_target(5, 4), ClickTarget::Body);
        assert_eq!(popover.click_target(1, 1), ClickTarget::Root);
        assert_eq!(popover.click_target(79, 23), ClickTarget::Outside);
    }
}
