//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑、定时推进和退出清理

use std::time::Instant;

use tracing::info;

use super::actions::Action;
use super::state::{App, AppMode};

impl App {
    /// 核心逻辑分发，返回 true 表示退出
    pub fn dispatch(&mut self, action: Action, now: Instant) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::StartDraw => self.start_draw(now),
            Action::RemoveSelected => self.remove_selected(),
            Action::IncreaseDuration => self.lottery.step_duration(1),
            Action::DecreaseDuration => self.lottery.step_duration(-1),

            Action::StartInput => self.start_input(),
            Action::Cancel => self.cancel(),
            Action::Submit => {
                if self.mode == AppMode::Input {
                    self.confirm_add_option();
                }
            }

            Action::Input(c) => {
                if self.mode == AppMode::Input {
                    self.input_buffer.push(c);
                }
            }

            Action::DeleteChar => {
                if self.mode == AppMode::Input {
                    self.input_buffer.pop();
                }
            }
        }
        false
    }

    // ============ 导航相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.lottery.options().len() {
            self.selected_index += 1;
        }
    }

    // ============ 选项相关 ============

    /// 打开输入框，抽签中不可用
    pub fn start_input(&mut self) {
        if !self.lottery.is_drawing() {
            self.mode = AppMode::Input;
        }
    }

    /// 确认添加选项，只有添加成功才清空输入
    pub fn confirm_add_option(&mut self) {
        if self.lottery.add_option(&self.input_buffer) {
            self.input_buffer.clear();
            self.selected_index = self.lottery.options().len() - 1;
        }
    }

    /// 删除当前选中的选项
    pub fn remove_selected(&mut self) {
        if self.lottery.remove_option(self.selected_index).is_some() {
            self.clamp_selection();
        }
    }

    /// 退出输入框
    pub fn cancel(&mut self) {
        self.mode = AppMode::Normal;
    }

    // ============ 抽签相关 ============

    /// 开始抽签，同时停掉上一轮还没结束的彩纸
    pub fn start_draw(&mut self, now: Instant) {
        if self.lottery.start_draw(now) {
            self.mode = AppMode::Normal;
            self.confetti.deactivate();
        }
    }

    /// 推进所有定时任务到 `now`
    pub fn on_tick(&mut self, now: Instant) {
        if self.lottery.advance(now, &mut self.rng).is_some() {
            self.confetti.activate(
                self.viewport.width,
                self.viewport.height,
                now,
                &mut self.rng,
            );
        }
        self.confetti.update(now, &mut self.rng);
    }

    /// 退出前取消所有定时任务
    pub fn teardown(&mut self) {
        self.lottery.cancel();
        self.confetti.deactivate();
        info!("定时任务已全部取消");
    }
}
