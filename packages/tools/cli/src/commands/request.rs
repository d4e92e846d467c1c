//! Bridge 토큰 요청

use serde::{Deserialize, Serialize};

use crate::commands::{http, print_json};
use crate::config::CliConfig;
use crate::OutputFormat;

#[derive(Serialize)]
struct Req {
    content_id: u64,
    user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl_seconds: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Resp {
    token: String,
    expires_at: String,
    preview_url: Option<String>,
    in_iframe: bool,
}

pub async fn request(
    config: &CliConfig,
    format: OutputFormat,
    content_id: u64,
    user_id: u64,
    action: Option<String>,
    ttl_seconds: Option<i64>,
) -> anyhow::Result<()> {
    let bridge_url = config.bridge_url()?;
    let client = http::client();

    tracing::debug!(bridge = %bridge_url, content_id, user_id, "requesting preview token");

    let resp: Resp = http::send_json(
        http::with_issuer_key(config, client.post(format!("{}/preview/token", bridge_url)))?
            .json(&Req {
                content_id,
                user_id,
                action,
                ttl_seconds,
            }),
    )
    .await?;

    match format {
        OutputFormat::Json => print_json(&resp),
        OutputFormat::Text => {
            println!("token:      {}", resp.token);
            println!("expires_at: {}", resp.expires_at);
            println!(
                "url:        {}",
                resp.preview_url.as_deref().unwrap_or("(no frontend configured)")
            );
            if resp.in_iframe {
                println!("iframe:     yes");
            }
            Ok(())
        }
    }
}
