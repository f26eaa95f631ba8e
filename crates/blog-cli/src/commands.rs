use std::path::Path;

use anyhow::{bail, Context};
use blog_server::{BlogServer, ServerConfig, StoreBackend};
use blog_store::FileDocumentStore;
use colored::Colorize;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(load_config(cli.config.as_deref(), &args)?).await,
        Command::Config(args) => cmd_config(load_config(cli.config.as_deref(), &args)?),
        Command::Compact(args) => cmd_compact(load_config(cli.config.as_deref(), &args)?),
    }
}

/// Read the config file (or defaults) and apply command-line overrides.
fn load_config(path: Option<&Path>, overrides: &OverrideArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = overrides.bind {
        config.bind_addr = bind;
    }
    if let Some(data) = &overrides.data {
        config.store.backend = StoreBackend::File;
        config.store.path = data.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn cmd_serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = match config.store.backend {
        StoreBackend::Memory => "memory".to_string(),
        StoreBackend::File => config.store.path.display().to_string(),
    };
    println!(
        "{} blog service on {} (store: {})",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        store.cyan()
    );
    let server = BlogServer::new(config).context("starting blog service")?;
    server.serve().await?;
    Ok(())
}

fn cmd_config(config: ServerConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_compact(config: ServerConfig) -> anyhow::Result<()> {
    let (before, after) = compact_journal(&config)?;
    println!(
        "{} Compacted {}: {} records → {}",
        "✓".green().bold(),
        config.store.path.display().to_string().bold(),
        before,
        after.to_string().green()
    );
    Ok(())
}

fn compact_journal(config: &ServerConfig) -> anyhow::Result<(u64, u64)> {
    if config.store.backend != StoreBackend::File {
        bail!("compact needs the file store; pass --data or set store.backend = \"file\"");
    }
    let store = FileDocumentStore::open(&config.store.path, config.store.sync_mode)
        .with_context(|| format!("opening journal {}", config.store.path.display()))?;
    let before = store.record_count()?;
    store.compact()?;
    Ok((before, store.record_count()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use blog_protocol::{CreateBlogRequest, DeleteBlogRequest};

    #[test]
    fn defaults_without_file_or_flags() {
        let config = load_config(None, &OverrideArgs::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.toml");
        std::fs::write(&path, "bind_addr = \"127.0.0.1:7000\"\n[service]\ndefault_list_limit = 10\n")
            .unwrap();

        let from_file = load_config(Some(&path), &OverrideArgs::default()).unwrap();
        assert_eq!(from_file.bind_addr, "127.0.0.1:7000".parse::<SocketAddr>().unwrap());
        assert_eq!(from_file.service.default_list_limit, 10);

        let overrides = OverrideArgs {
            bind: Some("0.0.0.0:9000".parse().unwrap()),
            data: Some(dir.path().join("posts.journal")),
        };
        let config = load_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.path, dir.path().join("posts.journal"));
        assert_eq!(config.service.default_list_limit, 10);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(load_config(Some(&missing), &OverrideArgs::default()).is_err());
    }

    #[test]
    fn compact_rejects_memory_store() {
        assert!(compact_journal(&ServerConfig::default()).is_err());
    }

    #[tokio::test]
    async fn compact_shrinks_journal() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = OverrideArgs { bind: None, data: Some(dir.path().join("blog.journal")) };
        let config = load_config(None, &overrides).unwrap();

        {
            let server = BlogServer::new(config.clone()).unwrap();
            let service = server.service();
            let first = CreateBlogRequest { title: "first".into(), content: "body".into() };
            let second = CreateBlogRequest { title: "second".into(), content: "body".into() };
            let created = service.create_blog(first).await.unwrap();
            service.create_blog(second).await.unwrap();
            service.delete_blog(DeleteBlogRequest { id: created.id }).await.unwrap();
        }

        let (before, after) = compact_journal(&config).unwrap();
        assert_eq!(before, 3);
        assert_eq!(after, 1);
    }
}
