//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::{App, AppMode, InputField};
use components::{render_dialog_framework, render_input_widget};
use layouts::centered_rect;

pub const LOADING_TEXT: &str = "加载中…";
pub const EMPTY_TEXT: &str = "还没有添加餐食。";

/// 列表区域显示的内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Empty,
    Entries,
}

impl ListView {
    pub fn of(app: &App) -> Self {
        if app.loading {
            ListView::Loading
        } else if app.meals.is_empty() {
            ListView::Empty
        } else {
            ListView::Entries
        }
    }
}

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(3), // 餐名
            Constraint::Length(3), // 卡路里
            Constraint::Min(5),    // 列表
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0]);
    render_form(frame, app, chunks[1], chunks[2]);
    render_meals(frame, app, chunks[3]);
    render_help(frame, app, chunks[4]);

    // 渲染弹窗
    if let AppMode::ConfirmDelete(id) = &app.mode {
        render_confirm_dialog(frame, app, id);
    }
    if let Some(alert) = &app.alert {
        render_alert_dialog(frame, alert);
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(format!("🍽️ 今日餐食  {}", app.today.format("%Y-%m-%d")))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_form(frame: &mut Frame, app: &App, name_area: Rect, calories_area: Rect) {
    let editing = app.editing_field();
    render_input_widget(
        frame,
        name_area,
        "餐名",
        &app.meal_name,
        "输入餐名",
        editing == Some(InputField::MealName),
    );
    render_input_widget(
        frame,
        calories_area,
        "卡路里",
        &app.calories,
        "输入卡路里",
        editing == Some(InputField::Calories),
    );
}

fn render_meals(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title("📋 全部餐食").borders(Borders::ALL);

    let placeholder = match ListView::of(app) {
        ListView::Loading => Some((LOADING_TEXT, Color::Cyan)),
        ListView::Empty => Some((EMPTY_TEXT, Color::DarkGray)),
        ListView::Entries => None,
    };
    if let Some((text, color)) = placeholder {
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .meals
        .iter()
        .enumerate()
        .map(|(i, meal)| {
            let style = if i == app.selected_index && app.mode == AppMode::Normal {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![Span::styled(meal.display_line(), style)];
            if !meal.user_id.is_empty() {
                spans.push(Span::styled(
                    format!("  @{}", meal.user_id),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::styled("  [删除]", Style::default().fg(Color::Red)));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match &app.mode {
        AppMode::Normal => "[a] 餐名  [c] 卡路里  [d] 删除  [r] 刷新  [j/k] 导航  [q] 退出",
        AppMode::Editing(_) => "[Enter] 添加  [Tab] 切换输入框  [Esc] 返回列表",
        AppMode::ConfirmDelete(_) => "[y] 确认  [n] 取消",
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_confirm_dialog(frame: &mut Frame, app: &App, id: &str) {
    let area = centered_rect(50, 20, frame.area());
    let inner = render_dialog_framework(frame, area, "⚠️ 确认删除", Color::Red);

    let name = app
        .meals
        .iter()
        .find(|meal| meal.id.as_deref() == Some(id))
        .map(|meal| meal.meal_name.as_str())
        .unwrap_or(id);

    let dialog = Paragraph::new(format!("确认删除 \"{}\"？\n\n[y] 确认  [n] 取消", name))
        .wrap(Wrap { trim: true });
    frame.render_widget(dialog, inner);
}

fn render_alert_dialog(frame: &mut Frame, alert: &str) {
    let area = centered_rect(50, 20, frame.area());
    let inner = render_dialog_framework(frame, area, "提示", Color::Yellow);

    let dialog = Paragraph::new(format!("{}\n\n[Enter] 确定", alert))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(dialog, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealEntry;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    /// 去掉空格（包括宽字符后的占位单元格）后的屏幕文字
    fn compact_text(terminal: &Terminal<TestBackend>) -> String {
        buffer_text(terminal)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    #[test]
    fn test_render_empty_list_shows_placeholder() {
        let mut app = App::new("demoUser");
        app.loading = false;

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = compact_text(&terminal);
        assert!(text.contains(EMPTY_TEXT));
        assert!(!text.contains(LOADING_TEXT));
        assert!(text.contains("输入餐名"));
        assert!(text.contains("输入卡路里"));
    }

    #[test]
    fn test_render_loading_placeholder() {
        let app = App::new("demoUser");

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = compact_text(&terminal);
        assert!(text.contains(LOADING_TEXT));
        assert!(!text.contains(EMPTY_TEXT));
    }

    #[test]
    fn test_list_view_states() {
        let mut app = App::new("demoUser");
        assert_eq!(ListView::of(&app), ListView::Loading);

        app.loading = false;
        assert_eq!(ListView::of(&app), ListView::Empty);

        app.meals.push(MealEntry {
            id: Some("1".to_string()),
            user_id: "demoUser".to_string(),
            meal_name: "Oatmeal".to_string(),
            calories: Some(350),
        });
        assert_eq!(ListView::of(&app), ListView::Entries);
    }

    #[test]
    fn test_render_entries_and_alert() {
        let mut app = App::new("demoUser");
        app.loading = false;
        app.meals.push(MealEntry {
            id: Some("1".to_string()),
            user_id: "demoUser".to_string(),
            meal_name: "Oatmeal".to_string(),
            calories: Some(350),
        });
        app.alert = Some("x".to_string());

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("350 cal"));
        assert!(text.contains("@demoUser"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let mut app = App::new("demoUser");
        app.mode = AppMode::ConfirmDelete("1".to_string());
        let mut terminal = Terminal::new(TestBackend::new(10, 5)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }
}
