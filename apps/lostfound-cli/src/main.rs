//! `lostfound`: browse, report and claim found items.
//!
//! Without `--api-url` everything lives in a local data directory and
//! moderation is unlocked with `lostfound admin on`. With `--api-url` the
//! collection comes from the Lost & Found API and moderation needs
//! `lostfound login`.

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use core_config::tracing::{init_cli_tracing, install_color_eyre};
use domain_items::{Category, ClaimRequest, FilterCriteria, ItemStatus, SortKey};
use eyre::{Result, bail};
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

mod catalog;
mod output;
mod session;
mod store;

use catalog::{Catalog, ReportForm};
use session::{Session, SessionState};
use store::{ItemStore, LocalStorage, LocalStore, RemoteStore};

#[derive(Parser)]
#[command(name = "lostfound", version)]
#[command(about = "Browse, report and claim found items")]
struct Cli {
    /// Base URL of the Lost & Found API. Local storage is used when unset.
    #[arg(long, env = "LOSTFOUND_API_URL", global = true)]
    api_url: Option<String>,

    /// Directory holding local items, the moderation flag and the admin token
    #[arg(long, env = "LOSTFOUND_DATA_DIR", default_value = ".lostfound", global = true)]
    data_dir: PathBuf,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List items, newest first unless sorted otherwise
    List(ListArgs),

    /// Show one item in full
    Show { id: Uuid },

    /// Report a found item
    Report(ReportArgs),

    /// Claim an unclaimed item (local storage only)
    Claim {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Something only the owner would know
        #[arg(long)]
        details: Option<String>,
    },

    /// Flip an item between claimed and unclaimed (moderation)
    Toggle { id: Uuid },

    /// Delete an item (moderation)
    Delete { id: Uuid },

    /// Log in to the API as admin
    Login {
        #[arg(long, env = "LOSTFOUND_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the cached admin token
    Logout,

    /// Show or switch local moderation mode
    Admin { mode: Option<Switch> },

    /// Replace the local collection with demo items
    Seed,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[derive(Args)]
struct ListArgs {
    /// Free-text search over title, description, location and category
    #[arg(short, long)]
    query: Option<String>,

    #[arg(long)]
    category: Option<Category>,

    /// unclaimed or claimed
    #[arg(long)]
    status: Option<ItemStatus>,

    /// Found on or after (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Found on or before (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// recent, oldest, title or category
    #[arg(long)]
    sort: Option<String>,
}

impl ListArgs {
    fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            q: self.query.unwrap_or_default(),
            category: self.category,
            status: self.status,
            from: self.from,
            to: self.to,
            sort: SortKey::parse(self.sort.as_deref()),
        }
    }
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    category: Option<Category>,
    /// Where the item was found
    #[arg(long)]
    location: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date_found: Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
    /// Photo to attach
    #[arg(long)]
    image: Option<PathBuf>,
}

impl From<ReportArgs> for ReportForm {
    fn from(args: ReportArgs) -> Self {
        ReportForm {
            title: args.title,
            category: args.category,
            location: args.location,
            date_found: args.date_found,
            description: args.description,
            image: args.image,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    init_cli_tracing(cli.verbose);

    let storage = LocalStorage::open(&cli.data_dir).await?;
    debug!(data_dir = %storage.dir().display(), remote = cli.api_url.is_some(), "Opened storage");

    let today = Utc::now().date_naive();
    let remote = cli
        .api_url
        .as_deref()
        .map(|url| RemoteStore::new(url, Session::new(storage.clone())));
    let local = LocalStore::new(storage.clone());

    match cli.command {
        Commands::Login { password } => {
            let Some(remote) = remote else {
                bail!("login needs --api-url; use `lostfound admin on` for local moderation");
            };
            remote.login(&password).await?;
            println!("Logged in");
        }
        Commands::Logout => {
            Session::new(storage).log_out().await?;
            println!("Logged out");
        }
        Commands::Admin { mode } => admin(&local, remote.as_ref(), mode).await?,
        Commands::Seed => {
            if remote.is_some() {
                bail!("seed only applies to local storage");
            }
            let items = local.seed(today).await?;
            println!("Seeded {} demo items", items.len());
        }
        command => {
            let store: Box<dyn ItemStore> = match remote {
                Some(remote) => Box::new(remote),
                None => {
                    local.seed_if_empty(today).await?;
                    Box::new(local)
                }
            };
            let catalog = Catalog::load(store).await?;
            run(catalog, command).await?;
        }
    }

    Ok(())
}

async fn admin(local: &LocalStore, remote: Option<&RemoteStore>, mode: Option<Switch>) -> Result<()> {
    if let Some(mode) = mode {
        local.set_admin(matches!(mode, Switch::On)).await?;
    }

    let on = local.is_admin().await?;
    println!("Moderation mode: {}", if on { "on" } else { "off" });

    if let Some(remote) = remote {
        let session = match remote.session().state().await? {
            SessionState::LoggedIn(_) => "logged in",
            SessionState::LoggedOut => "logged out",
        };
        println!("Admin session: {session}");
    }
    Ok(())
}

async fn run<S: ItemStore>(mut catalog: Catalog<S>, command: Commands) -> Result<()> {
    match command {
        Commands::List(args) => {
            let criteria = args.into_criteria();
            let items = catalog.visible(&criteria);
            println!("{}", output::listing(&items, catalog.items().len()));
        }
        Commands::Show { id } => match catalog.find(id) {
            Some(item) => println!("{}", output::item_details(item)),
            None => bail!("Item not found: {id}"),
        },
        Commands::Report(args) => {
            let item = catalog.report_item(args.into()).await?;
            println!("Thanks! Your item has been added to the list.");
            println!("{}", output::item_line(&item));
        }
        Commands::Claim {
            id,
            name,
            email,
            details,
        } => {
            let claim = ClaimRequest {
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
                details: details.unwrap_or_default(),
            };
            catalog.submit_claim(id, claim).await?;
            println!("Claim submitted. Staff will review it and contact you.");
        }
        Commands::Toggle { id } => {
            let item = catalog.toggle_status(id).await?;
            println!("{}", output::item_line(&item));
        }
        Commands::Delete { id } => {
            catalog.delete_item(id).await?;
            println!("Deleted {id}");
        }
        Commands::Login { .. } | Commands::Logout | Commands::Admin { .. } | Commands::Seed => {
            bail!("command does not operate on the item catalog")
        }
    }
    Ok(())
}
