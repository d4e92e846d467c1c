//! 서명 키 생성

use rand::RngCore;
use serde_json::json;

use hwp_core::auth::encode_key;

use crate::commands::print_json;
use crate::OutputFormat;

/// 32바이트 랜덤 시크릿 생성 (base64url)
pub fn keygen(format: OutputFormat) -> anyhow::Result<()> {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let key = encode_key(&bytes);

    match format {
        OutputFormat::Json => print_json(&json!({ "key": key })),
        OutputFormat::Text => {
            println!("{}", key);
            eprintln!("Set it as HWP_PREVIEW_SECRET on the Bridge.");
            Ok(())
        }
    }
}
