//! 通用 UI 组件
//!
//! 输入框、时长滑块、主按钮

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// [组件] 带有占位文字的输入框
pub fn render_input_widget(
    frame: &mut Frame,
    area: Rect,
    value: &str,
    placeholder: &str,
    is_focused: bool,
    is_disabled: bool,
) {
    let border_style = if is_disabled {
        Style::default().fg(Color::DarkGray)
    } else if is_focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    // 按显示宽度计算，中文字符占两列；末尾留一列给光标
    let text_width = u16::try_from(Line::from(value).width()).unwrap_or(u16::MAX);
    let visible = area.width.saturating_sub(3);
    let offset = text_width.saturating_sub(visible);

    let input = if value.is_empty() {
        Paragraph::new(placeholder).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(value)
            .style(Style::default().fg(Color::White))
            .scroll((0, offset))
    };

    frame.render_widget(
        input.block(Block::default().borders(Borders::ALL).border_style(border_style)),
        area,
    );

    if is_focused && !is_disabled {
        let cursor_x = area.x + 1 + (text_width - offset);
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

/// [组件] 时长滑块，标签保留一位小数
pub fn render_duration_slider(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    secs: f64,
    ratio: f64,
    is_disabled: bool,
) {
    let color = if is_disabled {
        Color::DarkGray
    } else {
        Color::Indexed(99)
    };

    let gauge = Gauge::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{secs:.1}"));
    frame.render_widget(gauge, area);
}

/// [组件] 主操作按钮
pub fn render_primary_button(frame: &mut Frame, area: Rect, label: &str, is_enabled: bool) {
    let style = if is_enabled {
        Style::default()
            .fg(Color::White)
            .bg(Color::Indexed(56))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, area);
}
