use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 餐食记录（服务器返回）
///
/// 标识符统一存放在 `id`：优先读取服务器的 `id` 字段，缺失时回退到 `_id`。
/// 数字标识符转换为十进制字符串。两者都没有时为 `None`，该记录无法删除。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawMealEntry")]
pub struct MealEntry {
    pub id: Option<String>,
    pub user_id: String,
    pub meal_name: String,
    pub calories: Option<u32>,
}

/// 服务器原始 JSON 结构
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMealEntry {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "_id")]
    underscore_id: Option<Value>,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    meal_name: String,
    #[serde(default)]
    calories: Option<Value>,
}

impl From<RawMealEntry> for MealEntry {
    fn from(raw: RawMealEntry) -> Self {
        let id = raw
            .id
            .as_ref()
            .and_then(id_to_string)
            .or_else(|| raw.underscore_id.as_ref().and_then(id_to_string));

        // 旧客户端可能写入了 null（NaN 序列化结果）
        let calories = raw
            .calories
            .as_ref()
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok());

        Self {
            id,
            user_id: raw.user_id,
            meal_name: raw.meal_name,
            calories,
        }
    }
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl MealEntry {
    /// 列表中显示的一行文字
    pub fn display_line(&self) -> String {
        match self.calories {
            Some(calories) => format!("{} — {} cal", self.meal_name, calories),
            None => format!("{} — ? cal", self.meal_name),
        }
    }
}

/// 提交给服务器的新记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMealEntry {
    pub user_id: String,
    pub meal_name: String,
    pub calories: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> MealEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decode_with_id() {
        let entry = decode(r#"{"id":"a1","userId":"demoUser","mealName":"Oatmeal","calories":350}"#);
        assert_eq!(entry.id.as_deref(), Some("a1"));
        assert_eq!(entry.user_id, "demoUser");
        assert_eq!(entry.meal_name, "Oatmeal");
        assert_eq!(entry.calories, Some(350));
    }

    #[test]
    fn test_decode_falls_back_to_underscore_id() {
        let entry = decode(r#"{"_id":"64f0c2","mealName":"Salad","calories":120}"#);
        assert_eq!(entry.id.as_deref(), Some("64f0c2"));
    }

    #[test]
    fn test_decode_prefers_id_over_underscore_id() {
        let entry = decode(r#"{"id":7,"_id":"other","mealName":"Soup","calories":90}"#);
        assert_eq!(entry.id.as_deref(), Some("7"));
    }

    #[test]
    fn test_decode_tolerates_missing_id_and_null_calories() {
        let entry = decode(r#"{"mealName":"Mystery","calories":null}"#);
        assert_eq!(entry.id, None);
        assert_eq!(entry.calories, None);
        assert_eq!(entry.display_line(), "Mystery — ? cal");
    }

    #[test]
    fn test_decode_list_keeps_server_order() {
        let entries: Vec<MealEntry> = serde_json::from_str(
            r#"[{"id":"2","mealName":"B","calories":2},{"id":"1","mealName":"A","calories":1}]"#,
        )
        .unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.meal_name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn test_new_entry_wire_format() {
        let entry = NewMealEntry {
            user_id: "demoUser".to_string(),
            meal_name: "Oatmeal".to_string(),
            calories: 350,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"userId": "demoUser", "mealName": "Oatmeal", "calories": 350})
        );
    }
}
