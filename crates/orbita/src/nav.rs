//! Navigation menu.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Clear, Paragraph, Widget},
};

use crate::page::Anchor;

/// Collapsible list of page sections.
#[derive(Debug, Clone, Default)]
pub struct NavMenu {
    open: bool,
    selected: usize,
}

impl NavMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Closing an already closed menu does nothing.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_previous(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Follow link `index`: returns the row to scroll to and closes the menu.
    pub fn follow(&mut self, anchors: &[Anchor], index: usize) -> Option<usize> {
        let anchor = anchors.get(index)?;
        self.selected = index;
        self.close();
        Some(anchor.row)
    }

    /// Popup area in the top-right corner of `area`.
    pub fn area(anchors: &[Anchor], area: Rect) -> Rect {
        let width = anchors
            .iter()
            .map(|a| a.label.len() as u16 + 6)
            .max()
            .unwrap_or(0)
            .max(14)
            .min(area.width);
        let height = (anchors.len() as u16 + 2).min(area.height);
        Rect::new(area.right().saturating_sub(width + 1), area.y + 1, width, height)
            .intersection(area)
    }
}

/// Renders an open [`NavMenu`].
pub struct NavView<'a> {
    pub menu: &'a NavMenu,
    pub anchors: &'a [Anchor],
}

impl Widget for NavView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.menu.is_open() {
            return;
        }
        let popup = NavMenu::area(self.anchors, area);
        let lines: Vec<Line> = self
            .anchors
            .iter()
            .enumerate()
            .map(|(i, anchor)| {
                let line = Line::from(format!(" {} {}", i + 1, anchor.label));
                if i == self.menu.selected() {
                    line.style(Style::new().reversed())
                } else {
                    line
                }
            })
            .collect();

        Clear.render(popup, buf);
        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(" menu ")
                    .dark_gray(),
            )
            .render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors() -> Vec<Anchor> {
        vec![
            Anchor {
                label: "Features",
                row: 20,
            },
            Anchor {
                label: "DEX",
                row: 40,
            },
        ]
    }

    #[test]
    fn test_follow_closes_menu() {
        let mut menu = NavMenu::default();
        menu.toggle();
        assert!(menu.is_open());
        assert_eq!(menu.follow(&anchors(), 1), Some(40));
        assert!(!menu.is_open());
        assert_eq!(menu.selected(), 1);
    }

    #[test]
    fn test_follow_unknown_link_is_noop() {
        let mut menu = NavMenu::default();
        menu.toggle();
        assert_eq!(menu.follow(&anchors(), 7), None);
        assert!(menu.is_open());
    }

    #[test]
    fn test_close_when_closed() {
        let mut menu = NavMenu::default();
        menu.close();
        assert!(!menu.is_open());
    }

    #[test]
    fn test_selection_wraps() {
        let mut menu = NavMenu::default();
        menu.select_previous(2);
        assert_eq!(menu.selected(), 1);
        menu.select_next(2);
        assert_eq!(menu.selected(), 0);
        menu.select_next(0);
        assert_eq!(menu.selected(), 0);
    }

    #[test]
    fn test_popup_renders_only_when_open() {
        let anchors = anchors();
        let mut menu = NavMenu::default();
        let area = Rect::new(0, 0, 40, 10);

        let mut buf = Buffer::empty(area);
        NavView {
            menu: &menu,
            anchors: &anchors,
        }
        .render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));

        menu.toggle();
        NavView {
            menu: &menu,
            anchors: &anchors,
        }
        .render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("1 Features"));
        assert!(text.contains("2 DEX"));
    }

    #[test]
    fn test_popup_fits_small_area() {
        let area = Rect::new(0, 0, 10, 3);
        let popup = NavMenu::area(&anchors(), area);
        assert!(area.contains(popup.as_position()) || popup.is_empty());
        assert!(popup.right() <= area.right());
        assert!(popup.bottom() <= area.bottom());
    }
}
