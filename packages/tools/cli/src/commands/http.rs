use anyhow::Context as _;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::CliConfig;

pub fn client() -> Client {
    Client::new()
}

pub fn with_issuer_key(config: &CliConfig, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
    let key = config.issuer_key()?;
    Ok(req.bearer_auth(key))
}

pub async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> anyhow::Result<T> {
    let resp = req.send().await.context("request failed")?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("request failed ({}): {}", status, text));
    }
    let body = resp.json::<T>().await.context("invalid json response")?;
    Ok(body)
}
