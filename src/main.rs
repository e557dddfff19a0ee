mod config;
mod confetti;
mod logging;
mod lottery;
mod models;
mod schedule;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::{info, warn};

use crate::config::{load_settings, settings_path};
use crate::ui::{App, render};

/// 没有定时任务时的轮询间隔
const IDLE_POLL: Duration = Duration::from_millis(250);

/// 获取数据目录路径 (~/.local/share/chouqian/)
fn get_data_dir() -> io::Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "无法获取用户数据目录"))?
        .join("chouqian");

    fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

fn main() -> io::Result<()> {
    // 先读配置，日志级别来自配置文件
    let loaded = settings_path().and_then(|path| load_settings(&path));
    let settings = loaded.as_ref().cloned().unwrap_or_default();

    let data_dir = get_data_dir()?;
    let log_guard = logging::init(&data_dir, &settings.log.level);
    if log_guard.is_none() {
        eprintln!("无法在 {} 创建日志文件，本次运行不记录日志", data_dir.display());
    }
    match &loaded {
        Ok(_) => info!(
            duration = settings.draw_duration().as_secs_f64(),
            particles = settings.confetti.particle_count,
            "配置已加载"
        ),
        Err(e) => warn!(error = %e, "配置加载失败，使用默认配置"),
    }

    // 创建应用状态
    let mut app = App::new(&settings);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 退出前取消所有定时任务
    app.teardown();

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Some(result) = app.lottery.result() {
        println!("抽签结果: {}", result.text);
    }

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // 等待按键或最近的定时任务到期
        let now = Instant::now();
        let timeout = app
            .next_deadline()
            .map_or(IDLE_POLL, |deadline| deadline.saturating_duration_since(now));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && ui::handle_key_event(app, key.code, Instant::now())?
                {
                    break;
                }
            }
        }

        app.on_tick(Instant::now());
    }
    Ok(())
}
