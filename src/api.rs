//! 餐食服务客户端
//!
//! `MealApi` 是 UI 运行时与远端服务之间的接缝；`HttpMealApi` 基于 reqwest 实现：
//!
//! - `GET    {base}`       列出全部记录
//! - `POST   {base}`       新增记录
//! - `DELETE {base}/{id}`  删除记录

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url, header};
use tracing::debug;

use crate::config::Config;
use crate::error::NetworkError;
use crate::models::{MealEntry, NewMealEntry};

/// 远端集合端点上的三种操作
#[async_trait]
pub trait MealApi: Send + Sync {
    async fn list(&self) -> Result<Vec<MealEntry>, NetworkError>;
    async fn create(&self, entry: &NewMealEntry) -> Result<(), NetworkError>;
    async fn delete(&self, id: &str) -> Result<(), NetworkError>;
}

#[derive(Debug, Clone)]
pub struct HttpMealApi {
    base_url: Url,
    http: Client,
    user_agent: String,
}

impl HttpMealApi {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("parse base url '{}'", config.base_url))?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("meal-log/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "building request");
        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    pub fn list_request(&self) -> RequestBuilder {
        self.request(Method::GET, self.base_url.clone())
    }

    pub fn create_request(&self, entry: &NewMealEntry) -> RequestBuilder {
        self.request(Method::POST, self.base_url.clone()).json(entry)
    }

    pub fn delete_request(&self, id: &str) -> RequestBuilder {
        self.request(Method::DELETE, self.entry_url(id))
    }

    /// `{base}/{id}`，标识符按路径段编码
    fn entry_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }
}

/// 发送请求，非 2xx 视为失败
async fn send(builder: RequestBuilder) -> Result<Response, NetworkError> {
    let response = builder.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(NetworkError::Status {
            status,
            url: response.url().to_string(),
        });
    }
    Ok(response)
}

#[async_trait]
impl MealApi for HttpMealApi {
    async fn list(&self) -> Result<Vec<MealEntry>, NetworkError> {
        let response = send(self.list_request()).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, entry: &NewMealEntry) -> Result<(), NetworkError> {
        // 响应体不使用，随后会重新拉取列表
        send(self.create_request(entry)).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), NetworkError> {
        send(self.delete_request(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpMealApi {
        let config = Config {
            base_url: "http://192.168.0.178:8080/api/dietplans".to_string(),
            ..Config::default()
        };
        HttpMealApi::new(&config).unwrap()
    }

    #[test]
    fn test_list_request() {
        let request = api().list_request().build().unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "http://192.168.0.178:8080/api/dietplans");
        let user_agent = request.headers()[header::USER_AGENT].to_str().unwrap();
        assert!(user_agent.starts_with("meal-log/"));
    }

    #[test]
    fn test_create_request_body() {
        let entry = NewMealEntry {
            user_id: "demoUser".to_string(),
            meal_name: "Oatmeal".to_string(),
            calories: 350,
        };
        let request = api().create_request(&entry).build().unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().path(), "/api/dietplans");

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"userId": "demoUser", "mealName": "Oatmeal", "calories": 350})
        );
    }

    #[test]
    fn test_delete_request_uses_underscore_id() {
        let entry: MealEntry =
            serde_json::from_str(r#"{"_id":"64f0c2","mealName":"Salad","calories":120}"#).unwrap();
        let id = entry.id.unwrap();
        let request = api().delete_request(&id).build().unwrap();
        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.url().path(), "/api/dietplans/64f0c2");
    }

    #[tokio::test]
    async fn test_https_base_url_is_supported() {
        // 端口 1 不会有服务监听：应在建立连接时失败，而不是因为不支持 https 被拒绝
        let config = Config {
            base_url: "https://127.0.0.1:1/api/dietplans".to_string(),
            request_timeout_secs: 5,
            ..Config::default()
        }
        .validate()
        .unwrap();
        let api = HttpMealApi::new(&config).unwrap();

        match api.list().await {
            Err(NetworkError::Transport(err)) => {
                let detail = format!("{err:?}");
                assert!(!detail.contains("scheme is not http"), "{detail}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_delete_request_encodes_id() {
        let request = api().delete_request("a/b").build().unwrap();
        assert_eq!(request.url().path(), "/api/dietplans/a%2Fb");
    }
}
