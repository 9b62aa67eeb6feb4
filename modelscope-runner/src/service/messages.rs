//! User-facing error messages
//!
//! Turns an [`OperationError`] into the one-line message shown to the person
//! running a workflow. The error itself is never altered; this is purely a
//! presentation step, available in English and Chinese.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use modelscope_client::ClientError;
use modelscope_core::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scheduler::JobError;
use crate::service::error::{OperationError, ValidationError};

/// Language of user-facing messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown locale {0:?} (expected \"en\" or \"zh\")")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Locale::En),
            "zh" | "zh-cn" | "chinese" => Ok(Locale::Zh),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::Zh => f.write_str("zh"),
        }
    }
}

/// Renders `err` for display in the given locale
pub fn describe_error(err: &OperationError, locale: Locale) -> String {
    match err {
        OperationError::Validation(err) => describe_validation(err, locale),
        OperationError::Client(err) => describe_client(err, locale),
        OperationError::Job(err) => describe_job(err, locale),
        OperationError::Output(err) => match locale {
            Locale::En => format!("Failed to encode result: {}", err),
            Locale::Zh => format!("结果编码失败: {}", err),
        },
    }
}

fn describe_client(err: &ClientError, locale: Locale) -> String {
    match err {
        ClientError::ApiError { status, message } => describe_status(*status, message, locale),
        ClientError::RequestFailed(source) => match source.status() {
            Some(status) => describe_status(status.as_u16(), &source.to_string(), locale),
            None => match locale {
                Locale::En => format!("Network error: {}", source),
                Locale::Zh => format!("网络错误: {}", source),
            },
        },
        ClientError::ParseError(message) => match locale {
            Locale::En => format!("Unexpected response from ModelScope: {}", message),
            Locale::Zh => format!("响应解析失败: {}", message),
        },
        ClientError::ConfigError(message) => match locale {
            Locale::En => format!("Invalid client configuration: {}", message),
            Locale::Zh => format!("客户端配置无效: {}", message),
        },
    }
}

fn describe_status(status: u16, message: &str, locale: Locale) -> String {
    let message = message.trim();
    match (status, locale) {
        (401, Locale::En) => "Authentication failed: check that the access token is correct".to_string(),
        (401, Locale::Zh) => "认证失败: 请检查Access Token是否正确".to_string(),
        (429, Locale::En) => "Rate limit exceeded: retry later or check the daily quota".to_string(),
        (429, Locale::Zh) => "请求频率超限: 请稍后重试或检查每日配额".to_string(),
        (400, Locale::En) => format!("Invalid request parameters: {}", message),
        (400, Locale::Zh) => format!("请求参数错误: {}", message),
        (500, Locale::En) => "ModelScope internal server error, please retry later".to_string(),
        (500, Locale::Zh) => "ModelScope服务内部错误，请稍后重试".to_string(),
        (_, Locale::En) => format!(
            "API call failed ({}): {}",
            status,
            if message.is_empty() { "no error details" } else { message }
        ),
        (_, Locale::Zh) => format!(
            "API调用失败 ({}): {}",
            status,
            if message.is_empty() { "无详细错误信息" } else { message }
        ),
    }
}

fn describe_job(err: &JobError, locale: Locale) -> String {
    match err {
        JobError::Submit(source) | JobError::StatusFetchFailed { source, .. } => {
            describe_client(source, locale)
        }
        JobError::JobFailed { message, .. } => match locale {
            Locale::En => format!("Image generation failed: {}", message),
            Locale::Zh => format!("图像生成失败: {}", message),
        },
        JobError::Timeout { handle, budget, .. } => match locale {
            Locale::En => format!(
                "Image generation timed out ({} minutes), task ID: {}",
                minutes(*budget),
                handle
            ),
            Locale::Zh => format!("图像生成超时 ({}分钟)，任务ID: {}", minutes(*budget), handle),
        },
        JobError::Cancelled { handle, .. } => match locale {
            Locale::En => format!("Image generation cancelled, task ID: {}", handle),
            Locale::Zh => format!("图像生成已取消，任务ID: {}", handle),
        },
        JobError::InvalidBudget => match locale {
            Locale::En => "Timeout must be greater than zero".to_string(),
            Locale::Zh => "超时时间必须大于0".to_string(),
        },
    }
}

fn describe_validation(err: &ValidationError, locale: Locale) -> String {
    if locale == Locale::En {
        let text = err.to_string();
        let mut chars = text.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => text,
        };
    }

    match err {
        ValidationError::EmptyPrompt => "提示词不能为空".to_string(),
        ValidationError::EmptyImageUrl => "图片URL不能为空".to_string(),
        ValidationError::EmptyMessages => "至少需要一条非空消息".to_string(),
        ValidationError::EmptyInput => "输入文本不能为空".to_string(),
        ValidationError::EmptyBatch => "批量输入至少需要一条非空文本".to_string(),
        ValidationError::InvalidTimeout(minutes) => format!("超时时间超出范围: {}分钟", minutes),
        ValidationError::Core(err) => match err {
            CoreError::UnsupportedModel { model, .. } => format!("不支持的模型: {}", model),
            CoreError::InvalidSize(size) => format!("无效的图像尺寸: {}", size),
            CoreError::InvalidRole(role) => format!("无效的消息角色: {}", role),
            CoreError::InvalidEncodingFormat(format) => format!("无效的编码格式: {}", format),
            CoreError::InvalidTemplate(template) => format!("无效的消息模板: {}", template),
        },
    }
}

/// Whole minutes when exact, one decimal otherwise
fn minutes(budget: Duration) -> String {
    let secs = budget.as_secs_f64();
    if budget.as_secs() % 60 == 0 && budget.subsec_nanos() == 0 {
        (budget.as_secs() / 60).to_string()
    } else {
        format!("{:.1}", secs / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelscope_core::catalog::ModelKind;
    use modelscope_core::domain::job::{JobHandle, JobStatus};

    fn api(status: u16, message: &str) -> OperationError {
        OperationError::Client(ClientError::api_error(status, message))
    }

    #[test]
    fn test_status_mapping_en() {
        assert!(describe_error(&api(401, "x"), Locale::En).starts_with("Authentication failed"));
        assert!(describe_error(&api(429, "x"), Locale::En).starts_with("Rate limit exceeded"));
        assert_eq!(
            describe_error(&api(400, "size not supported"), Locale::En),
            "Invalid request parameters: size not supported"
        );
        assert!(describe_error(&api(500, "boom"), Locale::En).contains("internal server error"));
        assert_eq!(
            describe_error(&api(503, "overloaded"), Locale::En),
            "API call failed (503): overloaded"
        );
        assert_eq!(
            describe_error(&api(404, ""), Locale::En),
            "API call failed (404): no error details"
        );
    }

    #[test]
    fn test_status_mapping_zh() {
        assert_eq!(
            describe_error(&api(401, "x"), Locale::Zh),
            "认证失败: 请检查Access Token是否正确"
        );
        assert_eq!(
            describe_error(&api(429, "x"), Locale::Zh),
            "请求频率超限: 请稍后重试或检查每日配额"
        );
        assert_eq!(describe_error(&api(400, "bad"), Locale::Zh), "请求参数错误: bad");
        assert_eq!(
            describe_error(&api(500, "x"), Locale::Zh),
            "ModelScope服务内部错误，请稍后重试"
        );
        assert_eq!(describe_error(&api(502, ""), Locale::Zh), "API调用失败 (502): 无详细错误信息");
    }

    #[test]
    fn test_job_errors() {
        let failed = OperationError::Job(JobError::JobFailed {
            handle: JobHandle::new("t-1"),
            message: "nsfw".to_string(),
        });
        assert_eq!(describe_error(&failed, Locale::En), "Image generation failed: nsfw");
        assert_eq!(describe_error(&failed, Locale::Zh), "图像生成失败: nsfw");

        let timeout = OperationError::Job(JobError::Timeout {
            handle: JobHandle::new("t-2"),
            last_status: JobStatus::Running,
            attempts: 20,
            elapsed: Duration::from_secs(301),
            budget: Duration::from_secs(300),
        });
        assert_eq!(
            describe_error(&timeout, Locale::En),
            "Image generation timed out (5 minutes), task ID: t-2"
        );
        assert_eq!(describe_error(&timeout, Locale::Zh), "图像生成超时 (5分钟)，任务ID: t-2");

        let fetch = OperationError::Job(JobError::StatusFetchFailed {
            handle: JobHandle::new("t-3"),
            attempts: 2,
            source: ClientError::api_error(401, "expired"),
        });
        assert!(describe_error(&fetch, Locale::En).starts_with("Authentication failed"));
    }

    #[test]
    fn test_mapping_leaves_error_untouched() {
        let err = api(429, "slow down");
        let _ = describe_error(&err, Locale::Zh);
        assert_eq!(err.client_error().and_then(|e| e.status()), Some(429));
    }

    #[test]
    fn test_validation_messages() {
        let err = OperationError::Validation(ValidationError::EmptyPrompt);
        assert_eq!(describe_error(&err, Locale::En), "Prompt cannot be empty");
        assert_eq!(describe_error(&err, Locale::Zh), "提示词不能为空");

        let err = OperationError::from(CoreError::UnsupportedModel {
            kind: ModelKind::Image,
            model: "foo/bar".to_string(),
        });
        assert_eq!(describe_error(&err, Locale::Zh), "不支持的模型: foo/bar");
    }

    #[test]
    fn test_fractional_minutes() {
        assert_eq!(minutes(Duration::from_secs(90)), "1.5");
        assert_eq!(minutes(Duration::from_secs(600)), "10");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("ZH".parse::<Locale>().unwrap(), Locale::Zh);
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::En);
    }
}
