//! Models API surface.

use std::collections::HashSet;
use std::sync::Arc;

use genai_probe_types::models::{
    GenerateContentRequest, ListModelsConfig, ListModelsResponse, Model,
};
use genai_probe_types::response::GenerateContentResponse;
use serde_json::Value;

use crate::client::ClientInner;
use crate::error::{Error, Result};

mod http;

use http::{build_model_method_url, build_models_list_url};

/// 一次成功的 `generateContent` 调用。
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// 原始 JSON 响应体。
    pub raw: Value,
    /// 按响应结构解析后的视图；结构不符时为 `None`。
    pub response: Option<GenerateContentResponse>,
    /// `candidates[0].content.parts[0].text`，路径缺失时为 `None`。
    pub text: Option<String>,
}

const TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

impl GenerationResult {
    /// 从原始 JSON 构建，缺失字段不会报错。
    ///
    /// 文本直接按固定路径读取原始 JSON，不依赖 `response` 能否解析。
    #[must_use]
    pub fn from_raw(raw: Value) -> Self {
        let response = serde_json::from_value::<GenerateContentResponse>(raw.clone()).ok();
        let text = raw
            .pointer(TEXT_POINTER)
            .and_then(Value::as_str)
            .map(ToString::to_string);
        Self {
            raw,
            response,
            text,
        }
    }
}

#[derive(Clone)]
pub struct Models {
    pub(crate) inner: Arc<ClientInner>,
}

impl Models {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// 以单条文本 prompt 调用 `generateContent`。
    pub async fn generate_content(
        &self,
        model: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Result<GenerationResult> {
        let model = model.into();
        let url = build_model_method_url(&self.inner, &model, "generateContent")?;
        let body = GenerateContentRequest::prompt(prompt);

        let request = self.inner.http.post(url).json(&body);
        let response = self.inner.send(request).await?;
        if !response.status().is_success() {
            return Err(Error::ApiError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        let value = response.json::<Value>().await?;
        Ok(GenerationResult::from_raw(value))
    }

    /// 列出模型（第一页）。
    pub async fn list(&self) -> Result<ListModelsResponse> {
        self.list_with_config(ListModelsConfig::default()).await
    }

    /// 列出模型（带配置）。
    pub async fn list_with_config(&self, config: ListModelsConfig) -> Result<ListModelsResponse> {
        let url = build_models_list_url(&self.inner, &config)?;
        let request = self.inner.http.get(url);
        let response = self.inner.send(request).await?;
        if !response.status().is_success() {
            return Err(Error::ApiError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        let result = response.json::<ListModelsResponse>().await?;
        Ok(result)
    }

    /// 列出所有模型（自动翻页）。
    pub async fn all(&self) -> Result<Vec<Model>> {
        self.all_with_config(ListModelsConfig::default()).await
    }

    /// 列出所有模型（带配置，自动翻页）。
    ///
    /// 服务端返回已经用过的 page token 时返回 `Error::Parse`。
    pub async fn all_with_config(&self, mut config: ListModelsConfig) -> Result<Vec<Model>> {
        let mut models = Vec::new();
        let mut seen_tokens: HashSet<String> = config.page_token.iter().cloned().collect();
        loop {
            let response = self.list_with_config(config.clone()).await?;
            if let Some(items) = response.models {
                models.extend(items);
            }
            match response.next_page_token {
                Some(token) if !token.is_empty() => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(Error::Parse {
                            message: format!("ListModels returned a page token twice: {token}"),
                        });
                    }
                    config.page_token = Some(token);
                }
                _ => break,
            }
        }
        Ok(models)
    }
}
