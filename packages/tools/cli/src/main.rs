//! HWP Preview CLI (`hwp`)
//!
//! 서명 키 생성, 로컬 토큰 발급/검증, preview URL 확인, Bridge 토큰 요청을 수행하는 Operator 도구입니다.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "hwp")]
#[command(author, version, about = "HWP CLI - Operator tool for headless previews", long_about = None)]
struct Cli {
    /// Bridge URL (overrides config)
    #[arg(long, global = true)]
    bridge: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    // ─────────────────────────────────────────────────────────────────────────
    // Keys & Tokens (local)
    // ─────────────────────────────────────────────────────────────────────────
    /// Generate a new signing secret
    Keygen,

    /// Issue, verify, or refresh tokens with HWP_PREVIEW_SECRET
    Token {
        /// Nonce lifespan in seconds (must match the Bridge's nonce_lifespan_seconds)
        #[arg(long, global = true, default_value_t = hwp_core::auth::DEFAULT_NONCE_LIFESPAN_SECS)]
        nonce_lifespan: i64,

        #[command(subcommand)]
        action: TokenAction,
    },

    /// Resolve the preview URL for a content item
    Url {
        /// Content ID
        #[arg(long)]
        id: u64,

        /// Token appended to the URL
        #[arg(long, default_value = "")]
        token: String,

        /// Preview settings YAML
        #[arg(long)]
        settings: Option<String>,

        /// Content list YAML (otherwise built from the flags below)
        #[arg(long)]
        content_file: Option<String>,

        /// Frontend base URL (overrides settings)
        #[arg(long)]
        frontend: Option<String>,

        #[arg(long = "type", default_value = "post")]
        content_type: String,

        #[arg(long, default_value = "draft")]
        status: String,

        #[arg(long)]
        uri: Option<String>,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        title: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Bridge (remote)
    // ─────────────────────────────────────────────────────────────────────────
    /// Request a preview token from the Bridge
    Request {
        #[arg(long)]
        content_id: u64,

        #[arg(long)]
        user_id: u64,

        #[arg(long)]
        action: Option<String>,

        #[arg(long)]
        ttl: Option<i64>,
    },

    /// Manage CLI config (~/.hwp/config.json)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Subcommand enums
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a nonce-bound token
    Issue {
        #[arg(long)]
        user: u64,

        /// Nonce action
        #[arg(long, default_value = hwp_core::auth::PREVIEW_NONCE_ACTION)]
        action: String,

        /// TTL in seconds
        #[arg(long, default_value_t = hwp_core::auth::DEFAULT_TOKEN_TTL_SECS)]
        ttl: i64,

        /// Extra token data (JSON object)
        #[arg(long)]
        data: Option<String>,
    },
    /// Verify a token and show the preview user
    Verify {
        token: String,

        #[arg(long, default_value = hwp_core::auth::PREVIEW_NONCE_ACTION)]
        action: String,
    },
    /// Re-issue a valid token with a new expiry
    Refresh {
        token: String,

        #[arg(long, default_value_t = hwp_core::auth::DEFAULT_TOKEN_TTL_SECS)]
        ttl: i64,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set config values
    Set {
        #[arg(long)]
        bridge_url: Option<String>,
        #[arg(long)]
        issuer_key: Option<String>,
    },
    /// Show current config
    Show,
    /// Clear config
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 로깅 초기화 (stdout은 명령 출력용)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hwp=info,hwp_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    // 설정 로드
    let mut config = CliConfig::load()?;
    if let Some(bridge) = cli.bridge {
        config.bridge_url = Some(bridge);
    }

    // 명령 실행
    match cli.command {
        Commands::Keygen => commands::keygen::keygen(format),

        Commands::Token {
            nonce_lifespan,
            action,
        } => match action {
            TokenAction::Issue { user, action, ttl, data } => {
                commands::token::issue(format, nonce_lifespan, user, &action, ttl, data.as_deref())
            }
            TokenAction::Verify { token, action } => {
                commands::token::verify(format, nonce_lifespan, &token, &action)
            }
            TokenAction::Refresh { token, ttl } => {
                commands::token::refresh(format, nonce_lifespan, &token, ttl)
            }
        },

        Commands::Url {
            id,
            token,
            settings,
            content_file,
            frontend,
            content_type,
            status,
            uri,
            slug,
            title,
        } => {
            let source = match content_file {
                Some(path) => commands::url::ContentSource::File(path),
                None => commands::url::ContentSource::Inline {
                    content_type,
                    status,
                    uri,
                    slug,
                    title,
                },
            };
            commands::url::resolve(format, id, &token, settings.as_deref(), frontend, source)
        }

        Commands::Request {
            content_id,
            user_id,
            action,
            ttl,
        } => commands::request::request(&config, format, content_id, user_id, action, ttl).await,

        Commands::Config { action } => match action {
            ConfigAction::Set {
                bridge_url,
                issuer_key,
            } => commands::config::set(bridge_url, issuer_key),
            ConfigAction::Show => commands::config::show(format),
            ConfigAction::Clear => commands::config::clear(),
        },
    }
}
