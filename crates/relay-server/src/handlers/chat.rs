//! 聊天接口
//!
//! `POST /api/chat` 与 `POST /v1/chat/completions` 共用同一个 handler。
//! 非流式返回一个 JSON 对象；流式返回 NDJSON（每行一个 StreamChunk）。

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use futures::StreamExt;
use relay_config::GenerationDefaults;
use relay_core::{ChatRequest, Message};
use relay_llm::LLMError;
use serde::Deserialize;

use crate::error::GatewayError;
use crate::state::Gateway;

/// 单个或多个停止序列
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StopSequences {
    One(String),
    Many(Vec<String>),
}

impl StopSequences {
    fn into_vec(self) -> Vec<String> {
        match self {
            StopSequences::One(s) => vec![s],
            StopSequences::Many(v) => v,
        }
    }
}

/// Ollama 风格的 options
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatOptions {
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub top_p: Option<f32>,
    /// 生成 token 上限；非正数表示不限制，此时使用默认值
    #[serde(default)]
    pub num_predict: Option<i64>,
    #[serde(default)]
    pub stop: Option<StopSequences>,
}

/// 聊天请求体
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequestBody {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default)]
    pub options: Option<ChatOptions>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub top_p: Option<f32>,
    #[serde(default)]
    pub stop: Option<StopSequences>,
}

impl ChatRequestBody {
    /// 顶层字段 > options > 配置默认值
    pub fn into_chat_request(self, defaults: &GenerationDefaults) -> ChatRequest {
        let options = self.options.unwrap_or_default();

        let num_predict = options
            .num_predict
            .filter(|n| *n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX));

        let stop = self
            .stop
            .or(options.stop)
            .map(StopSequences::into_vec)
            .unwrap_or_default();

        ChatRequest::new(self.model)
            .with_messages(self.messages)
            .stream(self.stream)
            .temperature(self.temperature.or(options.temperature).unwrap_or(defaults.temperature))
            .max_tokens(self.max_tokens.or(num_predict).unwrap_or(defaults.max_tokens))
            .top_p(self.top_p.or(options.top_p).unwrap_or(defaults.top_p))
            .with_stop(stop)
    }
}

/// 聊天处理器
pub async fn chat_handler(
    State(gateway): State<Arc<Gateway>>,
    payload: Result<Json<ChatRequestBody>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = payload.map_err(|e| GatewayError::BadRequest(e.body_text()))?;
    let request = body.into_chat_request(gateway.defaults());

    if !request.stream {
        let response = gateway.chat(&request).await?;
        return Ok(Json(response).into_response());
    }

    let stream = gateway.chat_stream(&request).await?;

    // 出错时结束响应体，调用方收到的是截断的流（没有 done=true）
    let lines = stream.map(|item| -> Result<Bytes, LLMError> {
        let chunk = item?;
        let mut line = serde_json::to_vec(&chunk)
            .map_err(|e| LLMError::Stream(format!("failed to encode chunk: {}", e)))?;
        line.push(b'\n');
        Ok(Bytes::from(line))
    });

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(lines),
    )
        .into_response())
}
