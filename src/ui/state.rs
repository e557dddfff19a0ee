//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::layout::Rect;

use crate::config::{Labels, Settings};
use crate::confetti::Confetti;
use crate::lottery::Lottery;
use crate::schedule::earliest;

/// 应用状态
pub struct App {
    pub lottery: Lottery,
    pub confetti: Confetti,
    pub labels: Labels,
    pub selected_index: usize,
    pub mode: AppMode,
    pub input_buffer: String,
    /// 上一次渲染的终端区域，彩纸在其中飘落
    pub viewport: Rect,
    pub rng: StdRng,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Input,
}

impl App {
    /// 创建新的应用实例
    pub fn new(settings: &Settings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: &Settings, rng: StdRng) -> Self {
        Self {
            lottery: Lottery::new(settings.draw_duration()),
            confetti: Confetti::new(settings.confetti_settings()),
            labels: settings.labels.clone(),
            selected_index: 0,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            viewport: Rect::default(),
            rng,
        }
    }

    /// 确保选中索引有效
    pub fn clamp_selection(&mut self) {
        let len = self.lottery.options().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// 主循环下一次需要醒来的时间
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([self.lottery.next_deadline(), self.confetti.next_deadline()])
    }
}
