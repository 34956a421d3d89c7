//! Demo binary: loads a route table and looks up paths against it. Grounded
//! on `main.rs`'s `clap::Parser` CLI struct and `server/bootstrap.rs`'s
//! `init_tracing` (`tracing_subscriber::registry()` + `EnvFilter` + fmt
//! layer), trimmed of the async runtime and non-blocking file appender —
//! this binary is a single synchronous build-then-query pass, not a server.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use hybrid_route_trie::config::RouteTableFile;
use hybrid_route_trie::Trie;

#[derive(Parser)]
#[command(name = "route-inspect", about = "Build a trie from a route table file and look up paths against it")]
struct Cli {
    /// Path to a .toml or .json route table.
    #[arg(short, long, default_value = "routes.toml")]
    routes: PathBuf,

    /// Allow a single missing or extra trailing '/' to still match.
    #[arg(long)]
    fix_trailing_slash: bool,

    /// Paths to look up.
    paths: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let table = RouteTableFile::load(&cli.routes)?;
    let mut trie: Trie<serde_json::Value> = Trie::new();
    for entry in table.routes {
        trie.insert(&entry.pattern, entry.context)?;
    }

    for path in &cli.paths {
        match trie.lookup(path, cli.fix_trailing_slash) {
            Some(m) => println!("{path} -> {} params={:?}", m.context, m.params),
            None => println!("{path} -> not found"),
        }
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
