use ratatui::prelude::Rect;

/// Helper for dialog layout with optional instructions area
pub struct DialogLayout {
    pub content_area: Rect,
    pub instructions_area: Option<Rect>,
}

/// Rows needed to show `instructions` wrapped inside a bordered box of `width`
pub fn instructions_height(width: u16, instructions: &str) -> u16 {
    let wrap_width = width.saturating_sub(4).max(10) as usize;
    let wrapped_lines = textwrap::wrap(instructions, wrap_width);
    (wrapped_lines.len() as u16).max(1) + 2
}

/// Split `area` into content with an instructions box along the bottom edge
pub fn split_dialog_area(
    area: Rect,
    show_instructions: bool,
    instructions: Option<&str>,
) -> DialogLayout {
    if !show_instructions {
        return DialogLayout { content_area: area, instructions_area: None };
    }
    let height = instructions_height(area.width, instructions.unwrap_or("")).min(area.height);
    let content_area = Rect { height: area.height - height, ..area };
    let instructions_area = Rect {
        y: area.y + content_area.height,
        height,
        ..area
    };
    DialogLayout { content_area, instructions_area: Some(instructions_area) }
}

/// Place a `width` x `height` box directly below `anchor`, clamped to `bounds`
pub fn below(anchor: Rect, bounds: Rect, width: u16, height: u16) -> Rect {
    let y = anchor.bottom().min(bounds.bottom());
    let x = anchor.x.min(bounds.right().saturating_sub(width)).max(bounds.x);
    Rect {
        x,
        y,
        width: width.min(bounds.right().saturating_sub(x)),
        height: height.min(bounds.bottom().saturating_sub(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_take_the_bottom_rows() {
        let area = Rect::new(0, 0, 40, 20);
        let layout = split_dialog_area(area, true, Some("a: Add Filter"));
        let instructions = layout.instructions_area.unwrap();
        assert_eq!(instructions.height, 3);
        assert_eq!(layout.content_area.height, 17);
        assert_eq!(instructions.y, 17);
    }

    #[test]
    fn hidden_instructions_leave_area_alone() {
        let area = Rect::new(2, 3, 40, 20);
        let layout = split_dialog_area(area, false, Some("ignored"));
        assert_eq!(layout.content_area, area);
        assert!(layout.instructions_area.is_none());
    }

    #[test]
    fn below_clamps_to_bounds() {
        let bounds = Rect::new(0, 0, 50, 10);
        let anchor = Rect::new(40, 0, 10, 3);
        let popup = below(anchor, bounds, 30, 20);
        assert_eq!(popup, Rect::new(20, 3, 30, 7));
    }
}
