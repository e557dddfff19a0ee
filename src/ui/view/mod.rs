//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::state::{App, AppMode};
use crate::lottery::DrawState;
use components::{render_duration_slider, render_input_widget, render_primary_button};
use layouts::card_rect;

const CARD_WIDTH: u16 = 72;
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    if app.viewport != area {
        app.viewport = area;
        app.confetti.resize(area.width, area.height);
    }

    let card = card_rect(CARD_WIDTH, area);
    let show_result = app.lottery.result().is_some();

    let mut constraints = vec![
        Constraint::Length(4), // 标题
        Constraint::Length(3), // 输入框
        Constraint::Length(3), // 时长
        Constraint::Min(4),    // 选项列表
    ];
    if show_result {
        constraints.push(Constraint::Length(5)); // 结果
    }
    constraints.push(Constraint::Length(3)); // 按钮
    constraints.push(Constraint::Length(1)); // 帮助

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(card);

    render_title(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_duration(frame, app, chunks[2]);
    render_options(frame, app, chunks[3]);

    let mut next = 4;
    if show_result {
        render_result(frame, app, chunks[next]);
        next += 1;
    }
    render_button(frame, app, chunks[next]);
    render_help(frame, app, chunks[next + 1]);

    // 彩纸覆盖在整个终端之上
    if app.confetti.is_active() {
        frame.render_widget(&app.confetti, area);
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            app.labels.title.as_str(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.labels.subtitle.as_str(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let title = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    render_input_widget(
        frame,
        area,
        &app.input_buffer,
        &app.labels.input_placeholder,
        app.mode == AppMode::Input,
        app.lottery.is_drawing(),
    );
}

fn render_duration(frame: &mut Frame, app: &App, area: Rect) {
    let duration = app.lottery.duration();
    render_duration_slider(
        frame,
        area,
        &app.labels.duration,
        duration.as_secs_f64(),
        duration.ratio(),
        app.lottery.is_drawing(),
    );
}

fn render_options(frame: &mut Frame, app: &App, area: Rect) {
    let options = app.lottery.options();
    let block = Block::default()
        .title(format!("{} ({})", app.labels.options, options.len()))
        .borders(Borders::ALL);

    if options.is_empty() {
        let hint = Paragraph::new(app.labels.empty_hint.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let drawing = app.lottery.is_drawing();
    let highlighted = app.lottery.highlighted();
    let result = app.lottery.result().map(|r| r.text.as_str());

    let items: Vec<ListItem> = options
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let is_selected = !drawing && i == app.selected_index;
            let marker = if is_selected { "› " } else { "  " };

            let style = if drawing && highlighted == Some(i) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD)
            } else if result == Some(option.as_str()) {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };

            let mut spans = vec![Span::styled(format!("{marker}{option}"), style)];
            // 删除按钮只在非抽签状态显示
            if is_selected {
                spans.push(Span::styled("  [d] 删除", Style::default().fg(Color::Red)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block);

    // 抽签时滚动跟随闪烁项
    let mut state = ListState::default();
    state.select(if drawing {
        highlighted
    } else {
        Some(app.selected_index)
    });

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let Some(result) = app.lottery.result() else {
        return;
    };

    let text = vec![
        Line::from(Span::styled(
            result.text.as_str(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            result.committed_at.format("%H:%M:%S").to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let panel = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .title(app.labels.result.as_str())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(panel, area);
}

fn render_button(frame: &mut Frame, app: &App, area: Rect) {
    match app.lottery.state() {
        DrawState::Drawing { elapsed_ticks, .. } => {
            let spinner = SPINNER[*elapsed_ticks as usize % SPINNER.len()];
            let label = format!("{} {}", spinner, app.labels.drawing);
            render_primary_button(frame, area, &label, false);
        }
        _ => render_primary_button(frame, area, &app.labels.start, app.lottery.can_start()),
    }
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.lottery.is_drawing() {
        "[q] 退出"
    } else {
        match app.mode {
            AppMode::Normal => {
                "[a] 输入  [d] 删除  [h/l] 时长  [j/k] 导航  [Space] 开始  [q] 退出"
            }
            AppMode::Input => "[Enter] 添加  [Esc] 完成",
        }
    };

    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::config::Settings;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_empty_list_shows_hint() {
        let mut app = App::with_rng(&Settings::default(), StdRng::seed_from_u64(1));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("(0)"));
        assert!(text.contains("3.0"));
        assert_eq!(app.viewport, Rect::new(0, 0, 80, 24));
    }

    #[test]
    fn test_result_panel_after_draw() {
        let t0 = Instant::now();
        let mut app = App::with_rng(&Settings::default(), StdRng::seed_from_u64(2));
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        app.lottery.add_option("Alpha");
        app.lottery.add_option("Beta");
        app.lottery.set_duration(0.5);
        app.start_draw(t0);
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains(SPINNER[0]));

        app.on_tick(t0 + Duration::from_millis(500));
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        let result = app.lottery.result().unwrap();
        assert!(text.contains(&result.text));
        assert!(app.confetti.is_active());
    }
}
