//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use chrono::{Local, NaiveDate};

use crate::models::MealEntry;

/// 应用状态
pub struct App {
    pub meals: Vec<MealEntry>, // 服务器返回的顺序
    pub meal_name: String,
    pub calories: String,
    pub loading: bool, // 仅在首次加载期间为 true
    pub selected_index: usize,
    pub mode: AppMode,
    pub alert: Option<String>, // 阻塞式提示框
    pub message: Option<String>,
    pub user_id: String,
    pub today: NaiveDate,
    pub latest_fetch_seq: u64,
    pub should_quit: bool,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Editing(InputField),
    ConfirmDelete(String), // 待删除记录的 ID
}

/// 输入字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    MealName,
    Calories,
}

impl InputField {
    pub fn next(self) -> Self {
        match self {
            InputField::MealName => InputField::Calories,
            InputField::Calories => InputField::MealName,
        }
    }
}

impl App {
    /// 创建新的应用实例
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            meals: Vec::new(),
            meal_name: String::new(),
            calories: String::new(),
            loading: true,
            selected_index: 0,
            mode: AppMode::Normal,
            alert: None,
            message: None,
            user_id: user_id.into(),
            today: Local::now().date_naive(),
            latest_fetch_seq: 0,
            should_quit: false,
        }
    }

    /// 确保选中索引有效
    pub fn clamp_selection(&mut self) {
        if self.meals.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.meals.len() {
            self.selected_index = self.meals.len() - 1;
        }
    }

    /// 获取当前选中的记录
    pub fn selected_meal(&self) -> Option<&MealEntry> {
        self.meals.get(self.selected_index)
    }

    /// 获取输入字段对应的缓冲区
    pub fn buffer_mut(&mut self, field: InputField) -> &mut String {
        match field {
            InputField::MealName => &mut self.meal_name,
            InputField::Calories => &mut self.calories,
        }
    }
}
