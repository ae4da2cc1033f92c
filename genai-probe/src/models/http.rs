use crate::client::ClientInner;
use crate::error::{Error, Result};
use genai_probe_types::models::ListModelsConfig;

/// 拼接 `{base}{version}/models/{model}:{method}`。
///
/// 模型标识原样放入路径：`models/gemini-pro` 与 `gemini-pro` 是两个不同的端点变体。
pub(super) fn build_model_method_url(
    inner: &ClientInner,
    model: &str,
    method: &str,
) -> Result<String> {
    let model = model.trim();
    if model.is_empty() {
        return Err(Error::InvalidConfig {
            message: "Model identifier must not be empty".into(),
        });
    }
    let base = &inner.api_client.base_url;
    let version = &inner.api_client.api_version;
    Ok(format!("{base}{version}/models/{model}:{method}"))
}

pub(super) fn build_models_list_url(
    inner: &ClientInner,
    config: &ListModelsConfig,
) -> Result<String> {
    let base = &inner.api_client.base_url;
    let version = &inner.api_client.api_version;
    add_list_query_params(&format!("{base}{version}/models"), config)
}

pub(super) fn add_list_query_params(url: &str, config: &ListModelsConfig) -> Result<String> {
    let mut url = reqwest::Url::parse(url).map_err(|err| Error::InvalidConfig {
        message: err.to_string(),
    })?;
    if config.page_size.is_some() || config.page_token.is_some() {
        let mut pairs = url.query_pairs_mut();
        if let Some(page_size) = config.page_size {
            pairs.append_pair("pageSize", &page_size.to_string());
        }
        if let Some(page_token) = &config.page_token {
            pairs.append_pair("pageToken", page_token);
        }
    }
    Ok(url.to_string())
}
