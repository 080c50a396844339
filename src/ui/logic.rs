//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和网络结果的处理。这里不做任何 I/O，
//! 所有网络操作都以 Effect 的形式交给运行时。

use tracing::{error, info, warn};

use super::actions::Action;
use super::effects::{Effect, Outcome};
use super::state::{App, AppMode, InputField};
use crate::error::ValidationError;
use crate::models::NewMealEntry;

impl App {
    /// 核心逻辑分发
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::StartEditing(field) => {
                self.mode = AppMode::Editing(field);
                self.message = None;
            }
            Action::StartDeleteMeal => self.start_delete_meal(),
            Action::Refresh => return vec![self.fetch_all()],

            Action::SwitchField => {
                if let AppMode::Editing(field) = self.mode {
                    self.mode = AppMode::Editing(field.next());
                }
            }

            Action::Cancel => self.cancel(),

            Action::Submit => match &self.mode {
                AppMode::Editing(_) => match self.submit() {
                    Ok(effect) => return vec![effect],
                    Err(err) => self.alert = Some(err.to_string()),
                },
                AppMode::ConfirmDelete(id) => {
                    let id = id.clone();
                    self.mode = AppMode::Normal;
                    return vec![self.remove(id)];
                }
                AppMode::Normal => {}
            },

            Action::Input(c) => {
                if let AppMode::Editing(field) = self.mode {
                    self.buffer_mut(field).push(c);
                }
            }

            Action::DeleteChar => {
                if let AppMode::Editing(field) = self.mode {
                    self.buffer_mut(field).pop();
                }
            }

            Action::DismissAlert => self.alert = None,
        }
        Vec::new()
    }

    // ============ 网络操作 ============

    /// 启动时的首次加载
    pub fn start(&mut self) -> Vec<Effect> {
        self.loading = true;
        vec![self.fetch_all()]
    }

    /// 拉取完整列表，每次分配新的序号
    pub fn fetch_all(&mut self) -> Effect {
        self.latest_fetch_seq += 1;
        Effect::FetchAll {
            seq: self.latest_fetch_seq,
        }
    }

    /// 校验输入并生成新增请求，不修改输入缓冲区
    pub fn submit(&self) -> Result<Effect, ValidationError> {
        let meal_name = self.meal_name.trim();
        let calories = self.calories.trim();
        if meal_name.is_empty() || calories.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        let calories: u32 = calories
            .parse()
            .map_err(|_| ValidationError::InvalidCalories(calories.to_string()))?;

        Ok(Effect::Create(NewMealEntry {
            user_id: self.user_id.clone(),
            meal_name: meal_name.to_string(),
            calories,
        }))
    }

    /// 按标识符删除
    pub fn remove(&self, id: String) -> Effect {
        Effect::Delete { id }
    }

    /// 处理网络结果
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::Listed { seq, result } => {
                // 只接受最新发出的那次拉取
                if seq < self.latest_fetch_seq {
                    warn!(seq, latest = self.latest_fetch_seq, "discarding stale list response");
                    return Vec::new();
                }
                match result {
                    Ok(meals) => {
                        self.meals = meals;
                        self.clamp_selection();
                    }
                    // 保留上一次成功的列表
                    Err(err) => error!(error = %err, "GET error"),
                }
                self.loading = false;
                Vec::new()
            }
            Outcome::Created(Ok(())) => {
                info!("meal added");
                self.meal_name.clear();
                self.calories.clear();
                self.message = Some("餐食已添加".to_string());
                vec![self.fetch_all()]
            }
            Outcome::Created(Err(err)) => {
                error!(error = %err, "POST error");
                self.alert = Some("添加餐食失败".to_string());
                Vec::new()
            }
            Outcome::Deleted { id, result: Ok(()) } => {
                info!(%id, "meal deleted");
                self.message = Some("餐食已删除".to_string());
                vec![self.fetch_all()]
            }
            Outcome::Deleted { id, result: Err(err) } => {
                error!(%id, error = %err, "DELETE error");
                self.alert = Some("删除餐食失败".to_string());
                Vec::new()
            }
        }
    }

    // ============ 导航相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.meals.len() {
            self.selected_index += 1;
        }
    }

    // ============ 删除相关 ============

    /// 开始删除：需要确认
    pub fn start_delete_meal(&mut self) {
        let Some(meal) = self.selected_meal() else {
            return;
        };
        match meal.id.clone() {
            Some(id) => self.mode = AppMode::ConfirmDelete(id),
            None => self.message = Some("该记录缺少标识符，无法删除".to_string()),
        }
    }

    // ============ 通用操作 ============

    /// 取消当前操作（保留已输入的内容）
    pub fn cancel(&mut self) {
        self.mode = AppMode::Normal;
        self.message = None;
    }

    /// 当前正在编辑的字段
    pub fn editing_field(&self) -> Option<InputField> {
        match self.mode {
            AppMode::Editing(field) => Some(field),
            _ => None,
        }
    }
}
