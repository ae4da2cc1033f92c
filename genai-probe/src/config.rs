//! Probe configuration.

use crate::error::{Error, Result};

/// 默认测试 prompt。
pub const DEFAULT_PROMPT: &str =
    "Hello, this is a test message. Please respond to confirm API is working.";

/// 默认候选模型，按探测顺序排列。
///
/// 同时包含带 `models/` 前缀和不带前缀的写法，两者会被当作不同端点分别尝试。
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "models/gemini-1.5-flash",
    "models/gemini-1.5-pro",
    "models/gemini-pro",
    "models/gemini-1.0-pro",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-pro",
];

/// 诊断流程的配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// 依次尝试的模型标识。
    pub candidates: Vec<String>,
    /// 发送给每个候选模型的 prompt。
    pub prompt: String,
    /// 是否先列出可用模型。
    pub list_models: bool,
    /// `ListModels` 每页大小；`None` 使用服务端默认值。
    pub page_size: Option<i32>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.iter().map(ToString::to_string).collect(),
            prompt: DEFAULT_PROMPT.to_string(),
            list_models: true,
            page_size: None,
        }
    }
}

impl ProbeConfig {
    /// 读取 `GENAI_PROBE_MODELS`（逗号分隔）与 `GENAI_PROBE_PROMPT` 覆盖默认值。
    ///
    /// # Errors
    /// 当 `GENAI_PROBE_MODELS` 已设置但不含任何模型时返回错误。
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("GENAI_PROBE_MODELS") {
            if !raw.trim().is_empty() {
                config.candidates = parse_model_list(&raw)?;
            }
        }
        if let Ok(prompt) = std::env::var("GENAI_PROBE_PROMPT") {
            if !prompt.trim().is_empty() {
                config.prompt = prompt;
            }
        }
        Ok(config)
    }

    /// 替换候选模型列表。
    #[must_use]
    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }
}

/// 解析逗号分隔的模型列表，去除空白项并保持顺序。
///
/// # Errors
/// 当列表不含任何模型时返回错误。
pub fn parse_model_list(raw: &str) -> Result<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(ToString::to_string)
        .collect();
    if models.is_empty() {
        return Err(Error::InvalidConfig {
            message: format!("No model identifiers in list: {raw:?}"),
        });
    }
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_env;

    #[test]
    fn default_candidates_keep_order() {
        let config = ProbeConfig::default();
        assert_eq!(config.candidates.len(), 7);
        assert_eq!(config.candidates[0], "models/gemini-1.5-flash");
        assert_eq!(config.candidates[6], "gemini-pro");
        assert!(config.list_models);
    }

    #[test]
    fn parse_model_list_drops_blanks() {
        let models = parse_model_list(" a , ,b,models/c ,").unwrap();
        assert_eq!(models, vec!["a", "b", "models/c"]);
    }

    #[test]
    fn parse_model_list_rejects_empty() {
        let err = parse_model_list(" , ").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn from_env_overrides_defaults() {
        with_env(
            &[
                ("GENAI_PROBE_MODELS", Some("gemini-2.0-flash,gemini-2.5-pro")),
                ("GENAI_PROBE_PROMPT", Some("ping")),
            ],
            || {
                let config = ProbeConfig::from_env().unwrap();
                assert_eq!(config.candidates, vec!["gemini-2.0-flash", "gemini-2.5-pro"]);
                assert_eq!(config.prompt, "ping");
            },
        );
    }

    #[test]
    fn from_env_ignores_blank_values() {
        with_env(
            &[
                ("GENAI_PROBE_MODELS", Some("  ")),
                ("GENAI_PROBE_PROMPT", None),
            ],
            || {
                let config = ProbeConfig::from_env().unwrap();
                assert_eq!(config, ProbeConfig::default());
            },
        );
    }

    #[test]
    fn from_env_rejects_list_without_models() {
        with_env(&[("GENAI_PROBE_MODELS", Some(",,"))], || {
            assert!(ProbeConfig::from_env().is_err());
        });
    }
}
