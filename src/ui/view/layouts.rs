//! 布局辅助函数

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// 居中的卡片区域，宽度不超过 `max_width`
pub fn card_rect(max_width: u16, area: Rect) -> Rect {
    let [column] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Max(max_width)])
        .flex(Flex::Center)
        .areas(area);
    column
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_rect_centers_and_caps_width() {
        let card = card_rect(72, Rect::new(0, 0, 100, 30));
        assert_eq!(card, Rect::new(14, 0, 72, 30));

        let narrow = card_rect(72, Rect::new(0, 0, 40, 10));
        assert_eq!(narrow, Rect::new(0, 0, 40, 10));
    }
}
