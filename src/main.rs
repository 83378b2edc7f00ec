use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use ppob_client::config::AppConfig;
use ppob_client::models::authentication::RegistrationRequest;
use ppob_client::models::profile::ImageUpload;
use ppob_client::repositories::api_repository::ApiRepository;
use ppob_client::repositories::token_repository::TokenRepository;
use ppob_client::services::portal_service::PortalService;

#[derive(Parser)]
#[clap(name = "ppob-client", about = "PPOB account portal client")]
struct Cli {
    #[clap(flatten)]
    config: AppConfig,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session token
    Login { email: String, password: String },
    /// Register a new account
    Register {
        email: String,
        first_name: String,
        last_name: String,
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Show profile, balance, services and banners
    Dashboard,
    /// Top up the balance
    Topup { amount: String },
    /// Pay a service by its code
    Pay { service_code: String },
    /// Show transaction history, optionally filtered by month (1-12)
    History {
        #[clap(long)]
        month: Option<u32>,
        /// How many pages to pull
        #[clap(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show the profile
    Profile,
    /// Update first and last name
    UpdateProfile { first_name: String, last_name: String },
    /// Upload a new profile image (JPEG or PNG, max 100 KiB)
    UpdateImage { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let tokens = TokenRepository::new(cli.config.token_path.clone());
    let gateway = Arc::new(ApiRepository::new(
        cli.config.api_base_url.clone(),
        tokens.clone(),
    ));
    let mut portal = PortalService::new(gateway, tokens);

    match cli.command {
        Command::Login { email, password } => {
            portal.session.login(&email, &password).await?;
            println!("logged in as {}", email);
        }
        Command::Register {
            email,
            first_name,
            last_name,
            password,
        } => {
            portal
                .session
                .register(RegistrationRequest {
                    email,
                    first_name,
                    last_name,
                    password,
                })
                .await?;
            println!("registered, log in to continue");
        }
        Command::Logout => {
            portal.logout();
            println!("logged out");
        }
        Command::Dashboard => {
            portal.ensure_dashboard().await?;
            print_dashboard(&portal);
            notify_if_expired(&mut portal);
        }
        Command::Topup { amount } => {
            let amount = PortalService::validate_top_up_amount(&amount)?;
            let new_balance = portal.top_up(amount).await?;
            println!("top-up accepted, balance is now {}", new_balance);
        }
        Command::Pay { service_code } => {
            portal.ensure_payment_catalogue().await?;
            portal.ensure_dashboard().await?;
            portal.payment.select_service(&service_code);
            portal.pay_selected_service().await?;
            let balance = portal
                .dashboard
                .state()
                .balance
                .map(|b| b.amount())
                .unwrap_or_default();
            println!("payment accepted, balance is now {}", balance);
        }
        Command::History { month, pages } => {
            portal.change_history_month(month).await?;
            for _ in 1..pages {
                portal.load_more_history().await?;
            }
            print_history(&portal);
            notify_if_expired(&mut portal);
        }
        Command::Profile => {
            portal.ensure_profile().await?;
            match &portal.profile.state().user_profile {
                Some(profile) => {
                    println!("{} {} <{}>", profile.first_name, profile.last_name, profile.email)
                }
                None => println!(
                    "profile unavailable: {}",
                    portal
                        .profile
                        .state()
                        .errors
                        .profile
                        .as_deref()
                        .unwrap_or("unknown error")
                ),
            }
            notify_if_expired(&mut portal);
        }
        Command::UpdateProfile {
            first_name,
            last_name,
        } => {
            portal.profile.update_profile(&first_name, &last_name).await?;
            println!("profile updated");
        }
        Command::UpdateImage { path } => {
            let upload = read_image(&path)?;
            portal.upload_profile_image(upload).await?;
            println!("profile image updated");
        }
    }

    Ok(())
}

fn print_dashboard(portal: &PortalService) {
    let state = portal.dashboard.state();
    match &state.user_profile {
        Some(profile) => println!("Welcome, {} {}", profile.first_name, profile.last_name),
        None => println!("profile: {}", error_or_loading(&state.errors.profile, state.loading.profile)),
    }
    match state.balance {
        Some(balance) => println!("Balance: Rp {}", balance.amount()),
        None => println!("balance: {}", error_or_loading(&state.errors.balance, state.loading.balance)),
    }
    println!("Services:");
    for service in &state.services {
        println!("  {:<12} {:<24} Rp {}", service.service_code, service.service_name, service.service_tariff);
    }
    println!("Banners:");
    for banner in &state.banners {
        println!("  {} - {}", banner.banner_name, banner.description);
    }
}

fn print_history(portal: &PortalService) {
    let state = portal.history.state();
    for tx in &state.transactions {
        let sign = if tx.transaction_type == "TOPUP" { "+" } else { "-" };
        println!(
            "{}  {}{:<10} {:<24} {}",
            tx.created_on, sign, tx.total_amount, tx.description, tx.invoice_number
        );
    }
    if let Some(error) = &state.error {
        println!("history fetch failed: {}", error);
    } else if !state.has_more {
        println!("(end of history)");
    }
}

fn notify_if_expired(portal: &mut PortalService) {
    if portal.check_session_expiry() {
        println!("session expired, please log in again");
    }
}

fn error_or_loading(error: &Option<String>, loading: bool) -> String {
    match error {
        Some(message) => message.clone(),
        None if loading => "loading".to_string(),
        None => "unavailable".to_string(),
    }
}

fn read_image(path: &PathBuf) -> anyhow::Result<ImageUpload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("profile")
        .to_string();
    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") => "image/jpg",
        Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
    .to_string();
    Ok(ImageUpload {
        file_name,
        content_type,
        bytes,
    })
}
