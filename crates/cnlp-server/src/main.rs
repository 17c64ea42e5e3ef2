use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use cnlp_dict::{LoadMode, load_count_dictionary, load_lemma_dictionary};
use cnlp_lemma::{Lemmatizer, SnowballStemmer};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cnlp_server::{AppState, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_LANGUAGE: &str = "dutch";

#[derive(Debug)]
struct Config {
    host: String,
    port: u16,
    lemma_dict: Option<PathBuf>,
    count_dict: Option<PathBuf>,
    load_mode: LoadMode,
    language: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config(env::args().skip(1))?;
    info!("binding to {}:{}", config.host, config.port);

    let lemmatizer = Lemmatizer::new(SnowballStemmer::for_language(&config.language)?);
    info!(
        "stemming with the {} snowball stemmer",
        lemmatizer.stemmer().language()
    );
    let state = AppState::new(lemmatizer);

    if let Some(path) = &config.lemma_dict {
        let start = Instant::now();
        let dict = load_lemma_dictionary(path, config.load_mode)?;
        let handle = state.registry.insert_lemma(dict);
        info!(
            "lemma dictionary {} preloaded as handle {handle} in {} ms",
            path.display(),
            start.elapsed().as_millis()
        );
    }
    if let Some(path) = &config.count_dict {
        let start = Instant::now();
        let dict = load_count_dictionary(path, config.load_mode)?;
        let handle = state.registry.insert_count(dict);
        info!(
            "count dictionary {} preloaded as handle {handle} in {} ms",
            path.display(),
            start.elapsed().as_millis()
        );
    }

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

/// Environment first, then `--key=value` flags on top.
fn load_config(args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let mut config = Config {
        host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        port: env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT),
        lemma_dict: env::var_os("LEMMA_DICT_PATH").map(PathBuf::from),
        count_dict: env::var_os("COUNT_DICT_PATH").map(PathBuf::from),
        load_mode: match env::var("DICT_LOAD_MODE") {
            Ok(raw) => parse_load_mode(&raw)?,
            Err(_) => LoadMode::default(),
        },
        language: env::var("STEMMER_LANGUAGE").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string()),
    };

    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("expected --key=value, got {arg:?}");
        };
        match key {
            "--lemma-dict" => config.lemma_dict = Some(PathBuf::from(value)),
            "--count-dict" => config.count_dict = Some(PathBuf::from(value)),
            "--load-mode" => config.load_mode = parse_load_mode(value)?,
            other => bail!("unknown flag {other}"),
        }
    }
    Ok(config)
}

fn parse_load_mode(raw: &str) -> anyhow::Result<LoadMode> {
    LoadMode::parse(raw).with_context(|| format!("invalid load mode {raw:?}, expected mmap or owned"))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .init();
}
