use chrono::{DateTime, Local};

/// 每秒的抽签刷新次数（每 50ms 一次）
pub const TICKS_PER_SECOND: u32 = 20;

/// 抽签时长下限（秒）
pub const MIN_DURATION_SECS: f64 = 0.5;
/// 抽签时长上限（秒）
pub const MAX_DURATION_SECS: f64 = 10.0;
/// 调节步长（秒）
pub const DURATION_STEP_SECS: f64 = 0.5;

const MIN_STEPS: u8 = 1;
const MAX_STEPS: u8 = 20;

/// 选项列表
///
/// 保持插入顺序，允许重复，所有元素都是去掉首尾空白后的非空字符串
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionList {
    items: Vec<String>,
}

impl OptionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加选项，空白输入被忽略
    pub fn push_trimmed(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.items.push(trimmed.to_string());
        true
    }

    /// 按下标删除，越界时返回 None
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

/// 抽签时长，以 0.5 秒为一档存储
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawDuration {
    steps: u8,
}

impl DrawDuration {
    /// 钳制到 [0.5, 10.0] 并对齐到 0.5 秒；NaN 返回 None
    pub fn from_secs(secs: f64) -> Option<Self> {
        if secs.is_nan() {
            return None;
        }
        let clamped = secs.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS);
        let steps = (clamped / DURATION_STEP_SECS).round() as u8;
        Some(Self {
            steps: steps.clamp(MIN_STEPS, MAX_STEPS),
        })
    }

    pub fn as_secs_f64(&self) -> f64 {
        f64::from(self.steps) * DURATION_STEP_SECS
    }

    /// 整个抽签过程的刷新次数：round(秒数 * 20)
    pub fn total_ticks(&self) -> u32 {
        (self.as_secs_f64() * f64::from(TICKS_PER_SECOND)).round() as u32
    }

    /// 上调或下调若干档，结果仍在范围内
    pub fn stepped(&self, delta: i8) -> Self {
        let steps = (i16::from(self.steps) + i16::from(delta))
            .clamp(i16::from(MIN_STEPS), i16::from(MAX_STEPS));
        Self { steps: steps as u8 }
    }

    /// 在取值范围内所处的比例，用于时长滑块
    pub fn ratio(&self) -> f64 {
        (self.as_secs_f64() - MIN_DURATION_SECS) / (MAX_DURATION_SECS - MIN_DURATION_SECS)
    }
}

impl Default for DrawDuration {
    fn default() -> Self {
        Self { steps: 6 }
    }
}

/// 抽签结果
///
/// `text` 是提交时刻选项文本的副本，之后修改列表不会影响已显示的结果
#[derive(Debug, Clone, PartialEq)]
pub struct DrawResult {
    pub index: usize,
    pub text: String,
    pub committed_at: DateTime<Local>,
}

impl DrawResult {
    pub fn new(index: usize, text: String) -> Self {
        Self {
            index,
            text,
            committed_at: Local::now(),
        }
    }
}
