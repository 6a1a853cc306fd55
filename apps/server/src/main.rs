use anyhow::Context;
use clap::{Parser, Subcommand};
use rescatando_backend_api::{build_router, AppState};
use rescatando_backend_runtime::{telemetry, BackendServices};
use rescatando_config::load as load_config;
use tokio::net::TcpListener;
use tracing::info;

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Parser)]
#[command(name = "rescatando-backend")]
#[command(about = "Rescatando shelter backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create the bootstrap administrator account if it is missing
    CreateAdmin {
        #[arg(long, default_value = "admin")]
        account: String,
        #[arg(long, default_value = "Administrador")]
        name: String,
        #[arg(long, default_value = "admin@rescatando.com")]
        email: String,
        /// Falls back to ADMIN_PASSWORD, then to a built-in default
        #[arg(long, env = "ADMIN_PASSWORD")]
        password: Option<String>,
    },
    /// Print animals, adoption requests, adoptions and users
    DumpData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::CreateAdmin {
            account,
            name,
            email,
            password,
        } => create_admin(&account, &name, &email, password).await,
        Commands::DumpData => dump_data().await,
    }
}

async fn initialise() -> anyhow::Result<(rescatando_config::AppConfig, BackendServices)> {
    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;
    Ok((config, services))
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting Rescatando backend");

    let (config, services) = initialise().await?;
    let state = AppState::new(services.authenticator.clone(), services.shelter.clone());
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, public_url = %config.http.public_base_url, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(rescatando_backend_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    services.db_pool.close().await;
    info!("backend shut down");
    Ok(())
}

async fn create_admin(
    account: &str,
    name: &str,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let (_, services) = initialise().await?;
    let password = password.unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());

    match services
        .authenticator
        .ensure_admin(account, name, email, &password)
        .await
        .context("failed to create administrator")?
    {
        Some(user) => println!("Created administrator {} ({})", user.account, user.public_id),
        None => println!("Account {account} already exists, nothing to do"),
    }

    Ok(())
}

async fn dump_data() -> anyhow::Result<()> {
    let (_, services) = initialise().await?;
    let shelter = &services.shelter;

    let animals = shelter.animals.list_all().await?;
    println!("=== ANIMALS ({}) ===", animals.len());
    println!(
        "{:<5} {:<20} {:<10} {:<5} {:<10} {:<10}",
        "ID", "Name", "Species", "Age", "Available", "Home"
    );
    for animal in &animals {
        println!(
            "{:<5} {:<20} {:<10} {:<5} {:<10} {:<10}",
            animal.id,
            animal.name,
            animal.species,
            animal.age,
            animal.available,
            animal.foster_home_id
        );
    }

    let requests = shelter.adoptions.list_requests().await?;
    println!();
    println!("=== ADOPTION REQUESTS ({}) ===", requests.len());
    println!(
        "{:<5} {:<20} {:<25} {:<20} {:<12}",
        "ID", "Animal", "Adopter", "Status", "Submitted"
    );
    for summary in &requests {
        println!(
            "{:<5} {:<20} {:<25} {:<20} {:<12}",
            summary.request.id,
            summary.animal_name,
            summary.adopter_name,
            summary.request.status,
            summary.request.submitted_on
        );
    }

    let adoptions = shelter.adoptions.list_adoptions().await?;
    println!();
    println!("=== ADOPTIONS ({}) ===", adoptions.len());
    println!(
        "{:<5} {:<20} {:<25} {:<20} {:<12}",
        "ID", "Animal", "Adopter", "Status", "Adopted"
    );
    for summary in &adoptions {
        println!(
            "{:<5} {:<20} {:<25} {:<20} {:<12}",
            summary.adoption.id,
            summary.animal_name,
            summary.adopter_name,
            summary.adoption.status,
            summary.adoption.adopted_on
        );
    }

    let users = shelter.users.list().await?;
    println!();
    println!("=== USERS ({}) ===", users.len());
    println!(
        "{:<26} {:<25} {:<20} {:<30} {:<10}",
        "Public ID", "Name", "Account", "Email", "Role"
    );
    for user in &users {
        println!(
            "{:<26} {:<25} {:<20} {:<30} {:<10}",
            user.public_id, user.name, user.account, user.email, user.role
        );
    }

    Ok(())
}
