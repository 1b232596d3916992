//! Request Context - Fingerprint
//!
//! 默认 request id = `method + "_" + url + 序列化(data)`，序列化与键顺序无关

use serde_json::{Map, Value};

use super::Method;

/// 生成默认 request id
///
/// `url` 为不带查询串的地址；`data` 以键排序后的 JSON 文本参与计算，
/// 空载荷不追加任何内容
pub fn fingerprint(method: Method, url: &str, data: &Map<String, Value>) -> String {
    let mut id = format!("{}_{}", method.as_lowercase(), url);
    if !data.is_empty() {
        let canonical = canonicalize(&Value::Object(data.clone()));
        id.push_str(&canonical.to_string());
    }
    id
}

/// 递归按键排序，使逻辑相同的载荷得到相同的序列化结果
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                if let Some(item) = map.get(key) {
                    sorted.insert(key.clone(), canonicalize(item));
                }
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
