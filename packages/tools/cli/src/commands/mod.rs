//! CLI 명령어 구현

pub mod config;
pub mod http;
pub mod keygen;
pub mod request;
pub mod token;
pub mod url;

use serde::Serialize;

/// JSON 출력
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
