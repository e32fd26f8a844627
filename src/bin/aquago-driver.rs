use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use aquago_driver::config::{ClientOptions, DistanceFailurePolicy, DriverConfig};
use aquago_driver::location::{FixedLocation, LocationSource, StoredLocation};
use aquago_driver::models::{Coordinate, DocumentKind};
use aquago_driver::screens::{
    DocumentScreen, LoginScreen, OrderBoard, OrderCard, OrderDetails, ProfileScreen, SignupScreen,
};
use aquago_driver::store::LocalStore;
use aquago_driver::upload::ImageFile;
use aquago_driver::{AquaGo, SessionContext};

#[derive(Parser, Debug)]
#[clap(name = "aquago-driver", version)]
#[clap(about = "Driver client for AquaGo water deliveries", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Keep orders whose distance lookup failed, with an unknown distance
    #[clap(long)]
    show_unknown_distance: bool,

    /// Seconds before a request is abandoned, 0 waits forever
    #[clap(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Seconds between order board refreshes with `orders --watch`
    #[clap(long, default_value_t = 7, value_parser = clap::value_parser!(u64).range(1..))]
    poll_secs: u64,

    /// Cloudinary folder receiving uploaded documents
    #[clap(long)]
    upload_folder: Option<String>,

    /// Output debug logs to stderr (RUST_LOG takes precedence)
    #[clap(long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in as a driver
    Login {
        #[clap(long)]
        email: String,
        #[clap(long, env = "AQUAGO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a driver account
    Signup {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
        #[clap(long, env = "AQUAGO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and clear the local cache
    Logout,
    /// List orders within range
    Orders {
        /// Keep refreshing until interrupted
        #[clap(long)]
        watch: bool,
        /// Current latitude; the last stored position is used otherwise
        #[clap(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Current longitude
        #[clap(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// Accept a confirmed order
    Accept { order_id: String },
    /// Mark an order delivered
    Deliver { order_id: String },
    /// Show one order
    Details { order_id: String },
    /// Show the driver profile and document status
    Profile,
    /// Upload a verification document (dl, rc or insurance)
    Upload { document: String, image: PathBuf },
}

fn init_logging(debug: bool) {
    let mut logger = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            logger.parse_filters(&filters);
        }
        Err(_) => {
            let level = if debug {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Warn
            };
            logger.filter_level(level);
        }
    }
    logger.init();
}

fn print_card(card: &OrderCard) {
    println!(
        "{}  {}  {}  {}",
        card.id(),
        card.order.status.label(),
        card.ordered_at,
        card.amount_text()
    );
    println!(
        "    {} | {} | {} ({})",
        card.customer.name.as_deref().unwrap_or("N/A"),
        card.water_type(),
        card.distance_text(),
        card.duration_text()
    );
    let actions: Vec<&str> = card.actions().iter().map(|a| a.label()).collect();
    if !actions.is_empty() {
        println!("    [{}]", actions.join("] ["));
    }
}

fn print_cards(cards: &[OrderCard]) {
    if cards.is_empty() {
        println!("No orders nearby");
    }
    for card in cards {
        print_card(card);
    }
}

async fn require_session(login: &LoginScreen) -> anyhow::Result<SessionContext> {
    login
        .restore()
        .await
        .ok_or_else(|| anyhow!("not logged in, run `aquago-driver login` first"))
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = DriverConfig::from_env()?;
    let timeout = (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs));
    let mut options = ClientOptions::default()
        .with_request_timeout(timeout)
        .with_order_poll_interval(Duration::from_secs(cli.poll_secs));
    if let Some(folder) = &cli.upload_folder {
        options = options.with_upload_folder(folder);
    }
    if cli.show_unknown_distance {
        options = options.with_distance_failure_policy(DistanceFailurePolicy::ShowUnknown);
    }

    let app = AquaGo::from_config(&config, options)?;
    let store = Arc::new(
        LocalStore::open(&config.cache_path)
            .await
            .with_context(|| format!("opening cache at {}", config.cache_path.display()))?,
    );
    let login = LoginScreen::new(app.clone(), store.clone());

    match cli.command {
        Commands::Login { email, password } => {
            let session = login.login(&email, &password).await?;
            println!("Logged in as {}", session.user_id);
        }
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let outcome = SignupScreen::new(app).sign_up(&name, &email, &password).await?;
            println!("Account {} created, you can log in now", outcome.user_id);
        }
        Commands::Logout => {
            if login.restore().await.is_none() {
                store.clear().await?;
            } else {
                login.logout().await;
            }
            println!("Logged out");
        }
        Commands::Orders { watch, lat, lng } => {
            let session = require_session(&login).await?;
            let location: Arc<dyn LocationSource> = match (lat, lng) {
                (Some(lat), Some(lng)) => Arc::new(FixedLocation(Coordinate::new(lat, lng))),
                _ => Arc::new(StoredLocation(store.clone())),
            };
            let mut board = OrderBoard::new(app, store, location, session);

            if watch {
                let mut handle = board.watch();
                loop {
                    tokio::select! {
                        snapshot = handle.changed() => match snapshot {
                            Some(cards) => {
                                println!("---");
                                print_cards(&cards);
                            }
                            None => break,
                        },
                        _ = tokio::signal::ctrl_c() => break,
                    }
                }
                handle.stop();
            } else {
                let cards = board.reload().await?;
                print_cards(cards);
            }
        }
        Commands::Accept { order_id } => {
            let session = require_session(&login).await?;
            let location = Arc::new(StoredLocation(store.clone()));
            let mut board = OrderBoard::new(app, store, location, session);
            if !board.accept(&order_id).await {
                bail!("could not accept order {}", order_id);
            }
            println!("Order {} accepted", order_id);
            print_cards(board.cards());
        }
        Commands::Deliver { order_id } => {
            require_session(&login).await?;
            let details = OrderDetails::new(app);
            let view = details
                .load(&order_id)
                .await
                .ok_or_else(|| anyhow!("order {} not found", order_id))?;
            if !details.deliver(&view).await {
                bail!("could not update order {}", order_id);
            }
            println!("Order {} delivered", view.delivery_target());
        }
        Commands::Details { order_id } => {
            require_session(&login).await?;
            let view = OrderDetails::new(app)
                .load(&order_id)
                .await
                .ok_or_else(|| anyhow!("order {} not found", order_id))?;
            println!("Order {} ({})", view.id, view.status.label());
            println!("Customer: {}", view.customer_name);
            println!("Phone:    {}", view.phone);
            println!("Address:  {}", view.address);
            println!("Water:    {}", view.water_type);
            println!("Amount:   {}", view.amount);
            println!("Ordered:  {}", view.ordered_at);
            if let Some(url) = view.maps_url() {
                println!("Map:      {}", url);
            }
            if let Some(url) = view.phone_url() {
                println!("Call:     {}", url);
            }
        }
        Commands::Profile => {
            let session = require_session(&login).await?;
            let view = ProfileScreen::new(app, store, session)
                .load()
                .await
                .ok_or_else(|| anyhow!("profile unavailable"))?;
            println!("{} ({})", view.name(), view.role());
            println!("{} | {}", view.email(), view.phone());
            println!("Deliveries: {}  Earnings: {}", view.deliveries(), view.earnings());
            for row in view.documents() {
                println!("  {:<32} {}", row.title(), row.status.label());
            }
        }
        Commands::Upload { document, image } => {
            let session = require_session(&login).await?;
            let document: DocumentKind = document.parse()?;
            let image = ImageFile::from_path(&image)
                .await
                .with_context(|| format!("reading {}", image.display()))?;
            let alert = DocumentScreen::new(app, session, document).upload(image).await;
            println!("{}: {}", alert.title, alert.message);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
