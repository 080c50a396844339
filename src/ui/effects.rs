//! 副作用与结果
//!
//! `dispatch` / `apply` 只返回 Effect，由运行时执行并把 Outcome 送回

use crate::error::NetworkError;
use crate::models::{MealEntry, NewMealEntry};

/// 需要运行时执行的网络操作
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchAll { seq: u64 },
    Create(NewMealEntry),
    Delete { id: String },
}

/// 网络操作的结果
#[derive(Debug)]
pub enum Outcome {
    Listed {
        seq: u64,
        result: Result<Vec<MealEntry>, NetworkError>,
    },
    Created(Result<(), NetworkError>),
    Deleted {
        id: String,
        result: Result<(), NetworkError>,
    },
}
