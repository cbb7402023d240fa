use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub list_area: Rect,
    pub detail_area: Rect,
    pub filters_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application
    /// Width: list (24) + details (16), height: list + filters (3) + status (1)
    pub const MIN_WIDTH: u16 = 40;
    pub const MIN_HEIGHT: u16 = 10;

    pub fn calculate(size: Rect, list_width_percent: u16) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // The detail pane keeps at least 16 columns
        let scaled = u32::from(inner_area.width) * u32::from(list_width_percent) / 100;
        let list_width = u16::try_from(scaled)
            .unwrap_or(u16::MAX)
            .max(24)
            .min(inner_area.width.saturating_sub(16));

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // List + details
                Constraint::Length(3), // Filters
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(list_width), Constraint::Min(1)])
            .split(vertical[0]);

        Self {
            inner_area,
            list_area: horizontal[0],
            detail_area: horizontal[1],
            filters_area: vertical[1],
            status_area: vertical[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn areas_fit_inside_border() {
        let layout = Layout::calculate(Rect::new(0, 0, 100, 30), 55);
        assert_eq!(layout.inner_area, Rect::new(1, 1, 98, 28));
        assert_eq!(layout.list_area.width + layout.detail_area.width, 98);
        assert_eq!(layout.filters_area.height, 3);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 28);
    }

    #[test]
    fn small_terminal_is_padded_to_minimum() {
        let layout = Layout::calculate(Rect::new(0, 0, 10, 5), 55);
        assert_eq!(layout.inner_area.width, Layout::MIN_WIDTH);
        assert!(layout.detail_area.width >= 16);
    }

    #[test]
    fn very_wide_terminal_splits_without_overflow() {
        let layout = Layout::calculate(Rect::new(0, 0, 1300, 40), 55);
        assert_eq!(layout.inner_area.width, 1298);
        assert_eq!(layout.list_area.width, 713);
        assert_eq!(layout.list_area.width + layout.detail_area.width, 1298);
    }

    #[test]
    fn list_share_above_full_width_still_leaves_detail_pane() {
        let layout = Layout::calculate(Rect::new(0, 0, 2000, 40), u16::MAX);
        assert_eq!(layout.detail_area.width, 16);
    }
}
