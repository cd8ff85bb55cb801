//! # 终端用户界面模块
//!
//! 基于 [ratatui](https://ratatui.rs/) 与 [crossterm](https://crates.io/crates/crossterm)
//! 的终端界面封装：负责进入/退出原始模式，并把终端事件转换为统一的 [`Event`]。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────┐  select!  ┌─────────────────┐  mpsc   ┌─────────────────┐
//! │ crossterm 事件流 │─────────▶│  后台 tokio 任务 │───────▶│   App 主循环     │
//! │ Tick / Render   │           │  (可取消)        │        │  (逐个处理事件)   │
//! └─────────────────┘           └─────────────────┘        └─────────────────┘
//! ```
//!
//! 所有选择器的状态转换都在主循环里同步执行，后台任务只负责读取终端事件。

use std::{
    io::{Stderr, stderr},
    ops::{Deref, DerefMut},
    time::Duration,
};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use futures::{FutureExt, StreamExt};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        cursor,
        event::{
            DisableBracketedPaste, EnableBracketedPaste, Event as CrosstermEvent, KeyEvent,
            KeyEventKind,
        },
        terminal::{EnterAlternateScreen, LeaveAlternateScreen},
    },
};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// TUI事件枚举
///
/// 统一了不同来源的事件（用户输入与定时器）。
#[derive(Clone, Debug)]
pub enum Event {
    /// 事件循环启动
    Init,

    /// 读取终端事件失败，通常导致应用程序退出
    Error,

    Tick,

    /// 触发界面重新渲染
    Render,

    FocusGained,
    FocusLost,

    /// 文本粘贴事件，包含粘贴的文本内容
    Paste(String),

    Key(KeyEvent),

    /// 终端大小调整事件，包含新的宽度和高度
    Resize(u16, u16),
}

impl From<KeyCode> for Event {
    fn from(value: KeyCode) -> Self {
        Event::Key(KeyEvent::new(value, KeyModifiers::NONE))
    }
}
impl From<char> for Event {
    fn from(value: char) -> Self {
        Event::Key(KeyEvent::new(KeyCode::Char(value), KeyModifiers::NONE))
    }
}

/// 基于Crossterm的终端实现
///
/// 包含异步事件循环、终端管理和资源清理。
pub struct Tui {
    pub terminal: ratatui::Terminal<CrosstermBackend<Stderr>>,
    pub task: JoinHandle<()>,
    /// 取消令牌，用于停止事件循环
    pub cancellation_token: CancellationToken,
    pub event_rx: UnboundedReceiver<Event>,
    pub event_tx: UnboundedSender<Event>,
    /// 帧率（每秒帧数）
    pub frame_rate: f64,
    /// Tick率（每秒tick数）
    pub tick_rate: f64,
    /// 是否启用括号粘贴模式
    pub paste: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = ratatui::Terminal::new(CrosstermBackend::new(stderr()))?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            task: tokio::spawn(async {}),
            cancellation_token: CancellationToken::new(),
            event_rx,
            event_tx,
            frame_rate: 60.0,
            tick_rate: 4.0,
            paste: true,
        })
    }

    pub fn tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// 启动异步事件循环
    ///
    /// 后台任务读取终端事件并按 tick/frame 频率发送定时事件，
    /// 事件通过内部通道传递给主循环。接收端关闭时任务自行结束。
    pub fn start(&mut self) {
        let tick_delay = Duration::from_secs_f64(1.0 / self.tick_rate);
        let render_delay = Duration::from_secs_f64(1.0 / self.frame_rate);
        self.cancel();
        self.cancellation_token = CancellationToken::new();
        let cancellation_token = self.cancellation_token.clone();
        let event_tx = self.event_tx.clone();
        self.task = tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            let mut render_interval = tokio::time::interval(render_delay);
            if event_tx.send(Event::Init).is_err() {
                return;
            }
            loop {
                let tick_delay = tick_interval.tick();
                let render_delay = render_interval.tick();
                let crossterm_event = reader.next().fuse();
                let event = tokio::select! {
                    _ = cancellation_token.cancelled() => break,
                    maybe_event = crossterm_event => match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Some(Ok(CrosstermEvent::Key(_) | CrosstermEvent::Mouse(_))) => continue,
                        Some(Ok(CrosstermEvent::Resize(x, y))) => Event::Resize(x, y),
                        Some(Ok(CrosstermEvent::FocusLost)) => Event::FocusLost,
                        Some(Ok(CrosstermEvent::FocusGained)) => Event::FocusGained,
                        Some(Ok(CrosstermEvent::Paste(s))) => Event::Paste(s),
                        Some(Err(_)) => Event::Error,
                        None => continue,
                    },
                    _ = tick_delay => Event::Tick,
                    _ = render_delay => Event::Render,
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });
    }

    /// 停止事件循环
    ///
    /// 发送取消信号并等待后台任务完成，超时后强制中止。
    pub fn stop(&self) -> Result<()> {
        self.cancel();
        let mut counter = 0;
        while !self.task.is_finished() {
            std::thread::sleep(Duration::from_millis(1));
            counter += 1;
            if counter > 50 {
                self.task.abort();
            }
            if counter > 100 {
                tracing::error!("Failed to abort task in 100 milliseconds for unknown reason");
                break;
            }
        }
        Ok(())
    }

    /// 进入TUI模式
    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stderr(), EnterAlternateScreen, cursor::Hide)?;
        if self.paste {
            crossterm::execute!(std::io::stderr(), EnableBracketedPaste)?;
        }
        self.start();
        Ok(())
    }

    /// 退出TUI模式
    pub fn exit(&mut self) -> Result<()> {
        self.stop()?;
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
            if self.paste {
                crossterm::execute!(std::io::stderr(), DisableBracketedPaste)?;
            }
            restore()?;
        }
        Ok(())
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    /// 暂停TUI（仅Unix系统发送SIGTSTP）
    pub fn suspend(&mut self) -> Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::signal::SIGTSTP)?;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.enter()?;
        Ok(())
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.event_rx
            .recv()
            .await
            .ok_or(color_eyre::eyre::eyre!("Unable to get event"))
    }
}

/// 恢复终端：离开备用屏幕并关闭原始模式
///
/// panic hook 中也会调用，因此不依赖 [`Tui`] 实例。
pub fn restore() -> Result<()> {
    if crossterm::terminal::is_raw_mode_enabled()? {
        crossterm::execute!(std::io::stderr(), LeaveAlternateScreen, cursor::Show)?;
        crossterm::terminal::disable_raw_mode()?;
    }
    Ok(())
}

impl Deref for Tui {
    type Target = ratatui::Terminal<CrosstermBackend<Stderr>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            tracing::error!("Unable to exit terminal: {:?}", e);
        }
    }
}
