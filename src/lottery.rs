//! 抽签控制器
//!
//! 持有选项列表、抽签时长和抽签状态机：
//! Idle --开始(>=2 个选项)--> Drawing --刷新次数用完--> ResultShown --开始--> Drawing
//!
//! 所有非法操作都是静默的空操作。

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::models::{DrawDuration, DrawResult, OptionList};
use crate::schedule::Interval;

/// 抽签刷新周期
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// 开始抽签所需的最少选项数
pub const MIN_OPTIONS: usize = 2;

/// 抽签状态
#[derive(Debug, Clone, PartialEq)]
pub enum DrawState {
    Idle,
    Drawing {
        /// 当前闪烁高亮的下标，第一次刷新前为 None
        highlighted: Option<usize>,
        elapsed_ticks: u32,
        total_ticks: u32,
    },
    ResultShown(DrawResult),
}

/// 抽签控制器
#[derive(Debug)]
pub struct Lottery {
    options: OptionList,
    duration: DrawDuration,
    state: DrawState,
    ticker: Option<Interval>,
}

impl Lottery {
    pub fn new(duration: DrawDuration) -> Self {
        Self {
            options: OptionList::new(),
            duration,
            state: DrawState::Idle,
            ticker: None,
        }
    }

    pub fn options(&self) -> &OptionList {
        &self.options
    }

    pub fn duration(&self) -> DrawDuration {
        self.duration
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    /// 是否满足开始抽签的条件
    pub fn can_start(&self) -> bool {
        !self.is_drawing() && self.options.len() >= MIN_OPTIONS
    }

    pub fn highlighted(&self) -> Option<usize> {
        match self.state {
            DrawState::Drawing { highlighted, .. } => highlighted,
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&DrawResult> {
        match &self.state {
            DrawState::ResultShown(result) => Some(result),
            _ => None,
        }
    }

    // ============ 列表与配置 ============

    /// 添加选项
    pub fn add_option(&mut self, text: &str) -> bool {
        if self.is_drawing() {
            debug!("抽签进行中，忽略添加");
            return false;
        }
        let added = self.options.push_trimmed(text);
        if added {
            info!(count = self.options.len(), "添加选项");
        }
        added
    }

    /// 删除选项
    pub fn remove_option(&mut self, index: usize) -> Option<String> {
        if self.is_drawing() {
            debug!(index, "抽签进行中，忽略删除");
            return None;
        }
        let removed = self.options.remove(index);
        match &removed {
            Some(_) => info!(index, count = self.options.len(), "删除选项"),
            None => debug!(index, "删除下标越界"),
        }
        removed
    }

    /// 设置抽签时长（秒）
    pub fn set_duration(&mut self, secs: f64) {
        if self.is_drawing() {
            return;
        }
        if let Some(duration) = DrawDuration::from_secs(secs) {
            self.duration = duration;
        }
    }

    /// 按 0.5 秒一档调节时长
    pub fn step_duration(&mut self, delta: i8) {
        self.set_duration(self.duration.stepped(delta).as_secs_f64());
    }

    // ============ 抽签流程 ============

    /// 开始抽签
    pub fn start_draw(&mut self, now: Instant) -> bool {
        if !self.can_start() {
            debug!(count = self.options.len(), "不满足开始条件");
            return false;
        }

        let total_ticks = self.duration.total_ticks();
        self.state = DrawState::Drawing {
            highlighted: None,
            elapsed_ticks: 0,
            total_ticks,
        };
        self.ticker = Some(Interval::start(TICK_INTERVAL, now));
        info!(
            options = self.options.len(),
            secs = self.duration.as_secs_f64(),
            total_ticks,
            "开始抽签"
        );
        true
    }

    /// 处理截至 `now` 到期的所有刷新
    ///
    /// 每次刷新独立地均匀抽取一个下标作为高亮；最后一次刷新抽到的下标即为结果。
    /// 提交结果时返回它的副本，供调用方触发庆祝动画。
    pub fn advance<R: Rng>(&mut self, now: Instant, rng: &mut R) -> Option<DrawResult> {
        let due = self.ticker.as_mut().map_or(0, |ticker| ticker.poll(now));

        for _ in 0..due {
            if let Some(result) = self.tick(rng) {
                return Some(result);
            }
        }
        None
    }

    fn tick<R: Rng>(&mut self, rng: &mut R) -> Option<DrawResult> {
        let DrawState::Drawing {
            highlighted,
            elapsed_ticks,
            total_ticks,
        } = &mut self.state
        else {
            return None;
        };

        let len = self.options.len();
        if len == 0 {
            return None;
        }

        let index = rng.gen_range(0..len);
        *highlighted = Some(index);
        *elapsed_ticks += 1;

        if *elapsed_ticks < *total_ticks {
            return None;
        }

        self.ticker = None;
        let text = self.options.get(index).unwrap_or_default().to_string();
        let result = DrawResult::new(index, text);
        info!(index = result.index, text = %result.text, "抽签结果");
        self.state = DrawState::ResultShown(result.clone());
        Some(result)
    }

    /// 下一次刷新的时间
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ticker.as_ref().map(Interval::next_due)
    }

    /// 丢弃刷新定时器句柄即取消；进行中的抽签作废并回到 Idle
    pub fn cancel(&mut self) {
        self.ticker = None;
        if self.is_drawing() {
            info!("抽签已取消");
            self.state = DrawState::Idle;
        }
    }
}

impl Default for Lottery {
    fn default() -> Self {
        Self::new(DrawDuration::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn elapsed_ticks(lottery: &Lottery) -> u32 {
        match lottery.state() {
            DrawState::Drawing { elapsed_ticks, .. } => *elapsed_ticks,
            _ => 0,
        }
    }

    fn lottery_with(options: &[&str], secs: f64) -> Lottery {
        let mut lottery = Lottery::default();
        lottery.set_duration(secs);
        for option in options {
            lottery.add_option(option);
        }
        lottery
    }

    #[test]
    fn test_add_ignores_blank() {
        let mut lottery = Lottery::default();
        assert!(lottery.add_option(" 一 "));
        assert!(!lottery.add_option(""));
        assert!(!lottery.add_option("   "));
        assert_eq!(lottery.options().as_slice(), ["一"]);
    }

    #[test]
    fn test_start_needs_two_options() {
        let t0 = Instant::now();
        let mut lottery = lottery_with(&["X"], 3.0);

        assert!(!lottery.can_start());
        assert!(!lottery.start_draw(t0));
        assert_eq!(lottery.state(), &DrawState::Idle);
        assert_eq!(lottery.next_deadline(), None);
    }

    #[test]
    fn test_mutations_locked_while_drawing() {
        let t0 = Instant::now();
        let mut lottery = lottery_with(&["A", "B", "C"], 2.0);
        assert!(lottery.start_draw(t0));

        assert!(!lottery.add_option("D"));
        assert_eq!(lottery.remove_option(0), None);
        lottery.set_duration(5.0);
        lottery.step_duration(1);

        assert_eq!(lottery.options().as_slice(), ["A", "B", "C"]);
        assert_eq!(lottery.duration().as_secs_f64(), 2.0);
        assert!(!lottery.start_draw(t0));
    }

    #[test]
    fn test_short_draw_commits_after_half_second() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(7);
        let mut lottery = lottery_with(&["A", "B"], 0.5);
        assert!(lottery.start_draw(t0));

        // 第 9 次刷新时仍在抽签
        assert_eq!(lottery.advance(t0 + Duration::from_millis(450), &mut rng), None);
        assert!(lottery.is_drawing());
        assert_eq!(elapsed_ticks(&lottery), 9);
        assert!(lottery.highlighted().is_some_and(|i| i < 2));

        let result = lottery
            .advance(t0 + Duration::from_millis(500), &mut rng)
            .expect("第 10 次刷新应提交结果");
        assert!(["A", "B"].contains(&result.text.as_str()));
        assert_eq!(lottery.result(), Some(&result));
        assert_eq!(lottery.highlighted(), None);
        assert_eq!(lottery.next_deadline(), None);
    }

    #[test]
    fn test_late_poll_processes_ticks_in_order() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lottery = lottery_with(&["A", "B", "C"], 1.0);
        lottery.start_draw(t0);

        let result = lottery.advance(t0 + Duration::from_secs(5), &mut rng);
        assert!(result.is_some());
        assert!(matches!(lottery.state(), DrawState::ResultShown(_)));

        // 提交之后不再有刷新
        assert_eq!(lottery.advance(t0 + Duration::from_secs(6), &mut rng), None);
    }

    #[test]
    fn test_flicker_stays_in_range() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(42);
        let mut lottery = lottery_with(&["A", "B", "C", "D"], 10.0);
        lottery.start_draw(t0);

        for n in 1..200u32 {
            lottery.advance(t0 + TICK_INTERVAL * n, &mut rng);
            assert!(lottery.highlighted().is_some_and(|i| i < 4));
            assert_eq!(elapsed_ticks(&lottery), n);
        }
    }

    #[test]
    fn test_result_is_a_snapshot() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(3);
        let mut lottery = lottery_with(&["A", "B"], 0.5);
        lottery.start_draw(t0);
        let result = lottery
            .advance(t0 + Duration::from_millis(500), &mut rng)
            .unwrap();

        lottery.remove_option(result.index);
        lottery.remove_option(0);
        lottery.add_option("Z");

        assert_eq!(lottery.result().map(|r| r.text.as_str()), Some(result.text.as_str()));
    }

    #[test]
    fn test_result_shown_allows_edits_and_redraw() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(9);
        let mut lottery = lottery_with(&["A", "B"], 0.5);
        lottery.start_draw(t0);
        lottery.advance(t0 + Duration::from_millis(500), &mut rng);
        assert!(lottery.result().is_some());

        assert!(lottery.add_option("C"));
        lottery.set_duration(1.0);
        assert_eq!(lottery.duration().as_secs_f64(), 1.0);

        let t1 = t0 + Duration::from_secs(1);
        assert!(lottery.start_draw(t1));
        assert_eq!(lottery.result(), None);
        assert!(lottery.advance(t1 + Duration::from_secs(1), &mut rng).is_some());
    }

    #[test]
    fn test_set_duration_clamps() {
        let mut lottery = Lottery::default();
        lottery.set_duration(0.1);
        assert_eq!(lottery.duration().as_secs_f64(), 0.5);
        lottery.set_duration(99.0);
        assert_eq!(lottery.duration().as_secs_f64(), 10.0);
        lottery.set_duration(f64::NAN);
        assert_eq!(lottery.duration().as_secs_f64(), 10.0);
    }

    #[test]
    fn test_cancel_stops_pending_ticks() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(5);
        let mut lottery = lottery_with(&["A", "B"], 0.5);
        lottery.start_draw(t0);
        lottery.advance(t0 + TICK_INTERVAL * 3, &mut rng);

        lottery.cancel();
        assert!(lottery.ticker.is_none());
        assert_eq!(lottery.state(), &DrawState::Idle);
        assert_eq!(lottery.next_deadline(), None);
        assert_eq!(lottery.advance(t0 + Duration::from_secs(2), &mut rng), None);
        assert_eq!(lottery.state(), &DrawState::Idle);
    }
}
