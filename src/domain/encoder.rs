//! 查询串编码与路径变量替换

use serde_json::{Map, Value};

const SEPARATOR: char = '&';
const MAPPING_OPERATOR: char = '=';
const PATH_VARIABLE_PREFIX: char = '$';

/// 将结构化参数编码为查询串
///
/// - 标量（字符串/数字/布尔）输出 `key=urlEncode(value)`
/// - 数组的子键为 `prefix[index]`，对象的子键为 `prefix.key`
/// - `prefix` 为空时直接使用子键
/// - `null` 不输出
pub fn encode_query(value: &Value, prefix: &str) -> String {
    let mut pairs = Vec::new();
    collect_pairs(value, prefix, &mut pairs);
    pairs.join(&SEPARATOR.to_string())
}

fn collect_pairs(value: &Value, key: &str, pairs: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            pairs.push(format!("{}{}{}", key, MAPPING_OPERATOR, encode_scalar(value)));
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let sub_key = if key.is_empty() {
                    index.to_string()
                } else {
                    format!("{}[{}]", key, index)
                };
                collect_pairs(item, &sub_key, pairs);
            }
        }
        Value::Object(map) => {
            for (name, item) in map {
                let sub_key = if key.is_empty() {
                    name.clone()
                } else {
                    format!("{}.{}", key, name)
                };
                collect_pairs(item, &sub_key, pairs);
            }
        }
    }
}

/// 标量值的 URL 编码；复合值先序列化为 JSON 文本
fn encode_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => urlencoding::encode(s).into_owned(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => urlencoding::encode(&other.to_string()).into_owned(),
    }
}

/// JavaScript 语义下的假值
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// 替换 URL 模板中的 `$` 前缀路径变量
///
/// 以 `$` 开头的参数会从 `params` 中移除。值为假值时连同其后的 `/` 一起删除，
/// 否则替换为 URL 编码后的值。纯文本替换，不校验路径段。
pub fn interpolate(template: &str, params: &mut Map<String, Value>) -> String {
    let mut variables: Vec<String> = params
        .keys()
        .filter(|k| k.starts_with(PATH_VARIABLE_PREFIX))
        .cloned()
        .collect();
    // 长变量名优先，避免 `$id` 吃掉 `$idx` 的前缀
    variables.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut url = template.to_string();
    for name in variables {
        let Some(value) = params.shift_remove(&name) else {
            continue;
        };
        if is_falsy(&value) {
            url = url.replace(&format!("{}/", name), "");
            url = url.replace(&name, "");
        } else {
            url = url.replace(&name, &encode_scalar(&value));
        }
    }
    url
}

/// 把查询串拼接到 URL 上
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let joiner = if url.contains('?') { SEPARATOR } else { '?' };
    format!("{}{}{}", url, joiner, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_encode_scalars_and_arrays() {
        let value = json!({"a": 1, "b": [2, 3]});
        assert_eq!(encode_query(&value, ""), "a=1&b[0]=2&b[1]=3");
    }

    #[test]
    fn test_encode_nested_object_uses_dot_keys() {
        let value = json!({"filter": {"name": "x", "tags": ["p", "q"]}});
        assert_eq!(
            encode_query(&value, ""),
            "filter.name=x&filter.tags[0]=p&filter.tags[1]=q"
        );
    }

    #[test]
    fn test_encode_with_prefix() {
        let value = json!({"page": 2});
        assert_eq!(encode_query(&value, "q"), "q.page=2");
    }

    #[test]
    fn test_encode_escapes_values() {
        let value = json!({"q": "a b&c", "ok": true});
        assert_eq!(encode_query(&value, ""), "q=a%20b%26c&ok=true");
    }

    #[test]
    fn test_encode_skips_null_and_empty_containers() {
        let value = json!({"a": null, "b": {}, "c": [], "d": "x"});
        assert_eq!(encode_query(&value, ""), "d=x");
    }

    #[test]
    fn test_encode_keeps_insertion_order() {
        let value = json!({"z": 1, "a": 2});
        assert_eq!(encode_query(&value, ""), "z=1&a=2");
    }

    #[test]
    fn test_interpolate_empty_variable_drops_segment() {
        let mut p = params(json!({"$ns": "", "page": 1}));
        assert_eq!(interpolate("/svc/$ns/list", &mut p), "/svc/list");
        assert!(!p.contains_key("$ns"));
        assert_eq!(p.get("page"), Some(&json!(1)));
    }

    #[test]
    fn test_interpolate_substitutes_value() {
        let mut p = params(json!({"$ns": "prod"}));
        assert_eq!(interpolate("/svc/$ns/list", &mut p), "/svc/prod/list");
        assert!(p.is_empty());
    }

    #[test]
    fn test_interpolate_encodes_and_handles_numbers() {
        let mut p = params(json!({"$name": "a/b", "$id": 42}));
        assert_eq!(
            interpolate("/users/$id/files/$name", &mut p),
            "/users/42/files/a%2Fb"
        );
    }

    #[test]
    fn test_interpolate_longer_names_first() {
        let mut p = params(json!({"$id": "1", "$idx": "2"}));
        assert_eq!(interpolate("/a/$idx/b/$id", &mut p), "/a/2/b/1");
    }

    #[test]
    fn test_interpolate_trailing_placeholder_removed_when_falsy() {
        let mut p = params(json!({"$id": null}));
        assert_eq!(interpolate("/items/$id", &mut p), "/items/");
    }

    #[test]
    fn test_append_query() {
        assert_eq!(append_query("/a", ""), "/a");
        assert_eq!(append_query("/a", "x=1"), "/a?x=1");
        assert_eq!(append_query("/a?y=2", "x=1"), "/a?y=2&x=1");
    }
}
