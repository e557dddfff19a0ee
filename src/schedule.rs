//! 可取消的定时任务
//!
//! 所有计时都由主循环传入的 `Instant` 驱动，定时器本身只是普通的值。
//! 持有者把句柄存在 `Option` 里，置为 None（丢弃句柄）即取消，不会留下悬空回调。

use std::time::{Duration, Instant};

/// 固定周期的重复任务
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next_due: Instant,
}

impl Interval {
    /// 从 `now` 开始计时，第一次触发在一个周期之后
    pub fn start(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// 返回截至 `now` 已到期的触发次数，并推进下一次触发时间
    pub fn poll(&mut self, now: Instant) -> u32 {
        if self.period.is_zero() {
            return 0;
        }

        let mut fired = 0;
        while self.next_due <= now {
            fired += 1;
            self.next_due += self.period;
        }
        fired
    }

    /// 下一次触发时间
    pub fn next_due(&self) -> Instant {
        self.next_due
    }
}

/// 一次性的到期任务
#[derive(Debug, Clone)]
pub struct Timeout {
    deadline: Instant,
}

impl Timeout {
    pub fn after(delay: Duration, now: Instant) -> Self {
        Self {
            deadline: now + delay,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// 取多个可选截止时间中最早的一个
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}
