use clap::{Parser, Subcommand};
use portfolio_carousel::browse::{self, Applied, BrowseCommand};
use portfolio_carousel::order::OrderRequest;
use portfolio_carousel::site::Site;
use portfolio_carousel::storage::FsStore;
use portfolio_carousel::{config, output};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "portfolio-carousel")]
#[command(about = "Portfolio catalog and image carousel for a bakery website")]
#[command(long_about = "\
Portfolio catalog and image carousel for a bakery website

The source directory mirrors the storage bucket. Every folder under the
root prefix is a category with a small metadata document:

  site/
  ├── config.toml                  # Site config (optional)
  └── portfolio/                   # storage.root_prefix
      ├── bolos/
      │   ├── index.json           # {\"title\": \"Bolos\", \"order\": 0, \"cover\": \"capa\"}
      │   ├── capa.webp            # Cover: <cover> + storage.cover_extension
      │   ├── 01-chocolate.jpg     # Gallery images (.webp, .png, .jpg)
      │   └── 02-morango.png
      └── rascunho/                # No index.json = not shown

Buttons are ordered by the metadata `order` field. Galleries are listed
only when a category is opened.

Run 'portfolio-carousel gen-config' to generate a documented config.toml.
Set RUST_LOG=portfolio_carousel=debug for detailed logs on stderr.")]
#[command(version = version_string())]
struct Cli {
    /// Site directory mirroring the storage bucket
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the catalog and list categories in button order
    Catalog,
    /// Render the portfolio page to <output>/index.html
    Build,
    /// Drive the carousel with commands read from stdin
    Browse,
    /// Print the WhatsApp link for an order
    OrderLink(OrderArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct OrderArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long, default_value = "")]
    email: String,
    /// Event date as YYYY-MM-DD
    #[arg(long)]
    date: String,
    #[arg(long, default_value_t = 0)]
    servings: u32,
    #[arg(long, default_value = "")]
    details: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("portfolio_carousel=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Catalog => {
            let site = load_site(&cli.source).await?;
            output::print_catalog_output(site.catalog());
        }
        Command::Build => {
            let site = load_site(&cli.source).await?;
            output::print_catalog_output(site.catalog());
            std::fs::create_dir_all(&cli.output)?;
            let index = cli.output.join("index.html");
            std::fs::write(&index, site.render().into_string())?;
            println!("==> Wrote {}", index.display());
        }
        Command::Browse => {
            let mut site = load_site(&cli.source).await?;
            output::print_catalog_output(site.catalog());
            run_browse(&mut site).await?;
        }
        Command::OrderLink(args) => {
            let site_config = config::load_config(&cli.source)?;
            let request = OrderRequest {
                name: args.name,
                phone: args.phone,
                email: args.email,
                event_date: args.date,
                servings: args.servings,
                details: args.details,
            };
            println!("{}", request.deep_link(&site_config.order)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

async fn load_site(source: &std::path::Path) -> Result<Site<FsStore>, config::ConfigError> {
    let site_config = config::load_config(source)?;
    let store = FsStore::new(source, &site_config.storage.public_base_url);
    Ok(Site::init(store, site_config).await)
}

/// Read commands until `quit` or end of input, printing the carousel after each.
async fn run_browse(site: &mut Site<FsStore>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match BrowseCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("error: {err}");
                continue;
            }
        };
        match browse::apply(site, command).await {
            Applied::Quit => break,
            Applied::Opened(None) => eprintln!("error: unknown category in '{}'", line.trim()),
            _ => {}
        }
        output::print_carousel_state(site.carousel());
    }
    Ok(())
}
