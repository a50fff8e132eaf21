//! FilterRow: one line of the filter popover (combiner, column, function, parameter, remove)
use ratatui::prelude::*;

use crate::filter::options::{next_option, prev_option};
use crate::filter::param::is_truthy;
use crate::filter::{
    ColumnMeta, Combiner, FilterEntry, FilterFunction, FilterParameter, SelectOption, Selection,
    column_options, combiner_options, function_options, select,
};

/// Controls of a row, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowField {
    Combiner,
    Column,
    Function,
    Parameter,
    Remove,
}

const FIRST_ROW_FIELDS: [RowField; 4] = [RowField::Column, RowField::Function, RowField::Parameter, RowField::Remove];
const ROW_FIELDS: [RowField; 5] = [
    RowField::Combiner,
    RowField::Column,
    RowField::Function,
    RowField::Parameter,
    RowField::Remove,
];

impl RowField {
    /// Focusable controls for the row at `index`. The first row has no combiner.
    pub fn focus_order(index: usize) -> &'static [RowField] {
        if index == 0 { &FIRST_ROW_FIELDS } else { &ROW_FIELDS }
    }

    pub fn is_select(self) -> bool {
        matches!(self, RowField::Combiner | RowField::Column | RowField::Function)
    }
}

/// An edit reported upward: the rebuilt entry and the position it replaces
#[derive(Debug, Clone, PartialEq)]
pub struct RowUpdate {
    pub filter: FilterEntry,
    pub index: usize,
}

/// Transient rendering hints from the popover
#[derive(Debug, Clone, Copy, Default)]
pub struct RowView<'a> {
    pub focused: Option<RowField>,
    /// Parameter edit buffer, shown instead of the stored value while editing
    pub param_text: Option<&'a str>,
    pub zebra: bool,
    pub focus_style: Style,
    pub placeholder_style: Style,
}

#[derive(Debug, Clone)]
pub struct FilterRow<'a> {
    index: usize,
    row_values: &'a FilterEntry,
    pub column_options: Vec<SelectOption<String>>,
    pub function_options: Vec<SelectOption<FilterFunction>>,
    pub combiner: Selection<Combiner>,
    pub key: Selection<String>,
    pub func: Selection<FilterFunction>,
}

impl<'a> FilterRow<'a> {
    pub fn new(index: usize, row_values: &'a FilterEntry, columns: &[ColumnMeta]) -> Self {
        let column_options = column_options(columns);
        let function_options = function_options(row_values.category);
        let combiner = select(&combiner_options(), &row_values.combiner);
        let key = select(&column_options, &row_values.key);
        let func = select(&function_options, &row_values.func_name);
        Self { index, row_values, column_options, function_options, combiner, key, func }
    }

    /// Stable identifier derived from position
    pub fn id(&self) -> String {
        format!("filter-row-{}", self.index)
    }

    /// The first row reads "Where"; every other row gets a combiner select
    pub fn shows_combiner(&self) -> bool {
        self.index != 0
    }

    /// Rebuild the entry from the current selections. A control with no
    /// selection keeps the row's existing value.
    fn convert_filter_data(&self) -> FilterEntry {
        FilterEntry {
            combiner: self.combiner.value().copied().unwrap_or(self.row_values.combiner),
            category: self.row_values.category,
            func_name: self.func.value().copied().unwrap_or(self.row_values.func_name),
            key: self.key.value().cloned().unwrap_or_else(|| self.row_values.key.clone()),
            parameter: self.row_values.parameter.clone(),
        }
    }

    fn update(&self, filter: FilterEntry) -> RowUpdate {
        RowUpdate { filter, index: self.index }
    }

    pub fn handle_combiner_change(&self, item: &SelectOption<Combiner>) -> RowUpdate {
        self.update(FilterEntry { combiner: item.value, ..self.convert_filter_data() })
    }

    pub fn handle_key_change(&self, item: &SelectOption<String>) -> RowUpdate {
        self.update(FilterEntry { key: item.value.clone(), ..self.convert_filter_data() })
    }

    pub fn handle_function_change(&self, item: &SelectOption<FilterFunction>) -> RowUpdate {
        self.update(FilterEntry { func_name: item.value, ..self.convert_filter_data() })
    }

    /// Numeric edit. Only a truthy value is reported; zero or unparsable input yields `None`.
    pub fn handle_param_change(&self, value: Option<f64>) -> Option<RowUpdate> {
        if !is_truthy(value) {
            return None;
        }
        let value = value?;
        Some(self.update(FilterEntry {
            parameter: FilterParameter::Number(value),
            ..self.convert_filter_data()
        }))
    }

    /// Text edit for string rows. Empty text yields `None`.
    pub fn handle_text_param_change(&self, text: &str) -> Option<RowUpdate> {
        if text.is_empty() {
            return None;
        }
        Some(self.update(FilterEntry {
            parameter: FilterParameter::Text(text.to_string()),
            ..self.convert_filter_data()
        }))
    }

    /// Step the select behind `field` to its next (or previous) option
    pub fn cycle(&self, field: RowField, forward: bool) -> Option<RowUpdate> {
        match field {
            RowField::Combiner if self.shows_combiner() => {
                let options = combiner_options();
                let picked = pick(&options, self.combiner.value(), forward)?;
                Some(self.handle_combiner_change(picked))
            }
            RowField::Column => {
                let picked = pick(&self.column_options, self.key.value(), forward)?;
                Some(self.handle_key_change(picked))
            }
            RowField::Function => {
                let picked = pick(&self.function_options, self.func.value(), forward)?;
                Some(self.handle_function_change(picked))
            }
            _ => None,
        }
    }

    /// Draw the row into a single-line `area`. Returns the hit box of each control.
    pub fn render(&self, area: Rect, buf: &mut Buffer, view: RowView) -> Vec<(Rect, RowField)> {
        if view.zebra {
            buf.set_style(area, Style::default().bg(Color::Rgb(30, 30, 30)));
        }
        let [combiner_area, column_area, function_area, param_area, remove_area] = Layout::horizontal([
            Constraint::Length(7),
            Constraint::Fill(1),
            Constraint::Length(13),
            Constraint::Length(14),
            Constraint::Length(3),
        ])
        .spacing(1)
        .areas(area);

        let style_for = |field: RowField| {
            if view.focused == Some(field) { view.focus_style } else { Style::default() }
        };
        let mut hits = Vec::with_capacity(5);

        if self.shows_combiner() {
            draw_select(buf, combiner_area, self.combiner.label(), style_for(RowField::Combiner), view.placeholder_style);
            hits.push((combiner_area, RowField::Combiner));
        } else {
            buf.set_stringn(combiner_area.x, combiner_area.y, "Where", combiner_area.width as usize, Style::default().add_modifier(Modifier::BOLD));
        }

        draw_select(buf, column_area, self.key.label(), style_for(RowField::Column), view.placeholder_style);
        hits.push((column_area, RowField::Column));

        draw_select(buf, function_area, self.func.label(), style_for(RowField::Function), view.placeholder_style);
        hits.push((function_area, RowField::Function));

        let param_text = view
            .param_text
            .map(str::to_string)
            .unwrap_or_else(|| self.row_values.parameter.to_string());
        let param_style = style_for(RowField::Parameter).add_modifier(Modifier::UNDERLINED);
        buf.set_style(param_area, param_style);
        buf.set_stringn(param_area.x, param_area.y, param_text, param_area.width as usize, param_style);
        hits.push((param_area, RowField::Parameter));

        let remove_style = if view.focused == Some(RowField::Remove) {
            view.focus_style
        } else {
            Style::default().fg(Color::Red)
        };
        buf.set_stringn(remove_area.x, remove_area.y, " ✕ ", remove_area.width as usize, remove_style);
        hits.push((remove_area, RowField::Remove));

        hits
    }
}

fn pick<'o, T: PartialEq>(options: &'o [SelectOption<T>], current: Option<&T>, forward: bool) -> Option<&'o SelectOption<T>> {
    if forward { next_option(options, current) } else { prev_option(options, current) }
}

fn draw_select(buf: &mut Buffer, area: Rect, label: Option<&str>, style: Style, placeholder: Style) {
    buf.set_style(area, style);
    let (text, text_style) = match label {
        Some(label) => (label, style),
        None => ("<select>", style.patch(placeholder)),
    };
    let width = area.width as usize;
    buf.set_stringn(area.x, area.y, text, width.saturating_sub(2), text_style);
    if area.width >= 2 {
        buf.set_string(area.right() - 1, area.y, "▾", style);
    }
}
