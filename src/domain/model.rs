use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Product identifier exactly as the frontend sent it.
///
/// Any JSON value is accepted at parse time; [`ProductId::as_identifier`]
/// decides whether it names a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub Value);

impl ProductId {
    /// `null`、`false`、0 與空字串視為未提供；數字與字串轉成路徑用的文字。
    /// `true`、陣列、物件無法當作產品代號，同樣視為未提供
    pub fn as_identifier(&self) -> Option<String> {
        match &self.0 {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => number_identifier(n),
            _ => None,
        }
    }
}

/// 整數值的浮點數（例如 `71.0`）以整數表示
fn number_identifier(n: &Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return (i != 0).then(|| i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }

    let f = n.as_f64()?;
    if f == 0.0 {
        None
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        Some(format!("{}", f as i64))
    } else {
        Some(n.to_string())
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(Value::String(id.to_string()))
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(Value::String(id))
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(Value::from(id))
    }
}

/// Body of `POST /create-task`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupRequest {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
}

impl MockupRequest {
    pub fn new(image_url: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            image_url: Some(image_url.into()),
            product_id: Some(ProductId(Value::String(product_id.into()))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub area_width: u32,
    pub area_height: u32,
    pub width: u32,
    pub height: u32,
    pub top: u32,
    pub left: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSpec {
    pub placement: Placement,
    pub image_url: String,
    pub position: Position,
}

/// Body sent to the mockup generator's create-task endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockupPayload {
    pub variant_ids: Vec<u64>,
    pub format: String,
    pub files: Vec<PlacementSpec>,
}

/// Query of `GET /api/get-task`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStatusQuery {
    pub task_key: Option<String>,
}

impl TaskStatusQuery {
    pub fn new(task_key: impl Into<String>) -> Self {
        Self {
            task_key: Some(task_key.into()),
        }
    }

    /// 從原始 query string 取出第一個 `task_key`
    pub fn from_query(query: Option<&str>) -> Self {
        let task_key = query.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "task_key")
                .map(|(_, value)| value.into_owned())
        });

        Self { task_key }
    }
}
