//! 终端运行时
//!
//! 负责终端初始化、事件循环，以及把 Effect 交给 `MealApi` 执行。
//! 每个 Effect 在独立的 tokio 任务中运行，结果通过 channel 送回 UI 循环。

use std::io;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::MealApi;
use crate::ui::{self, App, Effect, Outcome};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// 在独立线程中阻塞读取终端事件，并转发到 tokio channel
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(100);
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read event: {}", e);
                    break;
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn cleanup_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// 执行单个 Effect
pub async fn execute_effect(api: &dyn MealApi, effect: Effect) -> Outcome {
    match effect {
        Effect::FetchAll { seq } => Outcome::Listed {
            seq,
            result: api.list().await,
        },
        Effect::Create(entry) => Outcome::Created(api.create(&entry).await),
        Effect::Delete { id } => {
            let result = api.delete(&id).await;
            Outcome::Deleted { id, result }
        }
    }
}

/// 把 Effect 放到后台任务执行，不跟踪也不取消
fn spawn_effects(
    api: &Arc<dyn MealApi>,
    outcomes: &mpsc::UnboundedSender<Outcome>,
    effects: Vec<Effect>,
) {
    for effect in effects {
        debug!(?effect, "spawning effect");
        let api = Arc::clone(api);
        let outcomes = outcomes.clone();
        tokio::spawn(async move {
            let outcome = execute_effect(api.as_ref(), effect).await;
            // UI 已退出时丢弃结果
            let _ = outcomes.send(outcome);
        });
    }
}

/// 运行 TUI 直到用户退出
pub async fn run_app(app: &mut App, api: Arc<dyn MealApi>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, app, api).await;
    cleanup_terminal(&mut terminal)?;
    result
}

async fn event_loop(terminal: &mut Tui, app: &mut App, api: Arc<dyn MealApi>) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let (outcome_sender, mut outcome_receiver) = mpsc::unbounded_channel();

    spawn_effects(&api, &outcome_sender, app.start());

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // 输入线程已结束
                    break;
                };
                if let Event::Key(key) = event {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Some(action) = ui::map_key_event(app, &key) {
                        let effects = app.dispatch(action);
                        spawn_effects(&api, &outcome_sender, effects);
                    }
                }
            }
            Some(outcome) = outcome_receiver.recv() => {
                let effects = app.apply(outcome);
                spawn_effects(&api, &outcome_sender, effects);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
