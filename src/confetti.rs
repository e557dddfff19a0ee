//! 彩纸庆祝动画
//!
//! 抽签结果提交后激活，持续固定时长后自动停止。纯装饰，不影响抽签状态。

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};
use tracing::debug;

use crate::schedule::{Interval, Timeout, earliest};

/// 默认粒子数
pub const PARTICLE_COUNT: usize = 150;
/// 默认持续时间
pub const CONFETTI_DURATION: Duration = Duration::from_secs(3);
/// 默认帧率
pub const FRAMES_PER_SECOND: u32 = 60;

/// 按旋转角度选取的字形，粗细随粒子大小变化
const SMALL_GLYPHS: [char; 4] = ['╴', '╱', '╵', '╲'];
const LARGE_GLYPHS: [char; 4] = ['■', '◆', '▮', '◆'];

/// 粒子参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiSettings {
    pub particle_count: usize,
    pub duration: Duration,
    pub fps: u32,
}

impl Default for ConfettiSettings {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            duration: CONFETTI_DURATION,
            fps: FRAMES_PER_SECOND,
        }
    }
}

impl ConfettiSettings {
    fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

/// 单个彩纸粒子，坐标以终端字符格为单位
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// 色相 [0, 360)
    pub hue: f32,
    pub speed_y: f32,
    pub speed_x: f32,
    pub spin: f32,
    pub angle: f32,
}

impl Particle {
    fn spawn<R: Rng>(rng: &mut R, width: f32, height: f32) -> Self {
        Self {
            x: rng.gen_range(0.0..width),
            y: rng.gen_range(0.0..height) - height,
            size: rng.gen_range(0.5..1.5),
            hue: rng.gen_range(0.0..360.0),
            speed_y: rng.gen_range(0.1..0.4),
            speed_x: rng.gen_range(-0.15..0.15),
            spin: rng.gen_range(-0.1..0.1),
            angle: rng.gen_range(0.0..TAU),
        }
    }

    fn step<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32) {
        self.y += self.speed_y;
        self.x += self.speed_x;
        self.angle += self.spin;

        if self.y > height {
            self.y = -self.size;
            self.x = rng.gen_range(0.0..width);
        }
    }

    fn glyph(&self) -> char {
        let quarter = (self.angle.rem_euclid(TAU) / TAU * 4.0) as usize % 4;
        if self.size >= 1.0 {
            LARGE_GLYPHS[quarter]
        } else {
            SMALL_GLYPHS[quarter]
        }
    }

    fn color(&self) -> Color {
        let (r, g, b) = hsl_to_rgb(self.hue, 1.0, 0.7);
        Color::Rgb(r, g, b)
    }
}

/// 彩纸动画
#[derive(Debug)]
pub struct Confetti {
    settings: ConfettiSettings,
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    frames: Option<Interval>,
    expiry: Option<Timeout>,
}

impl Confetti {
    pub fn new(settings: ConfettiSettings) -> Self {
        Self {
            settings,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            frames: None,
            expiry: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.frames.is_some()
    }

    /// (重新)生成粒子并启动帧循环和到期计时
    pub fn activate<R: Rng>(&mut self, width: u16, height: u16, now: Instant, rng: &mut R) {
        self.width = f32::from(width.max(1));
        self.height = f32::from(height.max(1));
        self.particles = (0..self.settings.particle_count)
            .map(|_| Particle::spawn(rng, self.width, self.height))
            .collect();
        self.frames = Some(Interval::start(self.settings.frame_interval(), now));
        self.expiry = Some(Timeout::after(self.settings.duration, now));
        debug!(count = self.particles.len(), "彩纸开始");
    }

    /// 停止动画并丢弃粒子，两个定时器句柄随之丢弃
    pub fn deactivate(&mut self) {
        if self.frames.take().is_some() {
            debug!("彩纸结束");
        }
        self.expiry = None;
        self.particles.clear();
    }

    /// 跟随终端尺寸变化
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = f32::from(width.max(1));
        self.height = f32::from(height.max(1));
    }

    /// 推进到 `now`：到期则停止，否则逐帧更新
    pub fn update<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        if self.expiry.as_ref().is_some_and(|expiry| expiry.is_expired(now)) {
            self.deactivate();
            return;
        }

        let Some(frames) = self.frames.as_mut() else {
            return;
        };
        for _ in 0..frames.poll(now) {
            for particle in &mut self.particles {
                particle.step(rng, self.width, self.height);
            }
        }
    }

    /// 下一帧或到期时间中较早的一个
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([
            self.frames.as_ref().map(Interval::next_due),
            self.expiry.as_ref().map(Timeout::deadline),
        ])
    }
}

impl Default for Confetti {
    fn default() -> Self {
        Self::new(ConfettiSettings::default())
    }
}

impl Widget for &Confetti {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_active() {
            return;
        }

        for particle in &self.particles {
            if particle.x < 0.0 || particle.y < 0.0 {
                continue;
            }
            let (col, row) = (particle.x as u16, particle.y as u16);
            if col >= area.width || row >= area.height {
                continue;
            }
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_char(particle.glyph()).set_fg(particle.color());
            }
        }
    }
}

/// HSL 转 RGB，h 取 [0, 360)，s/l 取 [0, 1]
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}
