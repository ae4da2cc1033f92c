use serde::{Deserialize, Serialize};

/// 对话内容。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// 角色，例如 `model`；按原样保留。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// 消息内容片段。
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// 创建不带角色的文本内容（探测请求使用的最小形态）。
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// 提取第一段 Part 的文本。
    ///
    /// 只看第一段：返回值对应 `parts[0].text`，首段不是文本时返回 `None`。
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().and_then(Part::text_value)
    }
}

/// 内容部分。
///
/// 只建模文本；其余变体（inlineData、functionCall 等）反序列化时被忽略。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 是否为思考内容。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    /// 创建文本 Part。
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
        }
    }

    /// 获取文本内容。
    #[must_use]
    pub fn text_value(&self) -> Option<&str> {
        self.text.as_deref()
    }
}
