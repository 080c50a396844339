//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::Action;
use super::state::{App, AppMode, InputField};

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, has_alert: bool, key: KeyCode) -> Option<Action> {
    // 提示框是阻塞的，只响应关闭
    if has_alert {
        return match key {
            KeyCode::Enter | KeyCode::Esc => Some(Action::DismissAlert),
            _ => None,
        };
    }

    match mode {
        AppMode::Normal => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Char('a') => Some(Action::StartEditing(InputField::MealName)),
            KeyCode::Char('c') => Some(Action::StartEditing(InputField::Calories)),
            KeyCode::Char('d') => Some(Action::StartDeleteMeal),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        },
        AppMode::Editing(_) => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab | KeyCode::BackTab => Some(Action::SwitchField),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::ConfirmDelete(_) => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

/// 全局退出键 Ctrl+C
pub fn is_force_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// 将按键事件映射为 Action
pub fn map_key_event(app: &App, key: &KeyEvent) -> Option<Action> {
    if is_force_quit(key) {
        return Some(Action::Quit);
    }
    get_action(&app.mode, app.alert.is_some(), key.code)
}
