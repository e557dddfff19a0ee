//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use std::io;
use std::time::Instant;

use crossterm::event::KeyCode;

use super::actions::Action;
use super::state::{App, AppMode};

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, key: KeyCode) -> Option<Action> {
    match mode {
        AppMode::Normal => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Char('a') | KeyCode::Char('i') => Some(Action::StartInput),
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::RemoveSelected),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::IncreaseDuration),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::DecreaseDuration),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::StartDraw),
            _ => None,
        },
        AppMode::Input => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
    }
}

/// 处理按键事件
pub fn handle_key_event(app: &mut App, key: KeyCode, now: Instant) -> io::Result<bool> {
    if let Some(action) = get_action(&app.mode, key) {
        Ok(app.dispatch(action, now))
    } else {
        Ok(false)
    }
}
