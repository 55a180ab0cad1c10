//! UTP Fund admin console.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password from the environment or stdin)
//! UTP_ADMIN_PASSWORD=... utp-admin login ops@utpfund.live
//! utp-admin login ops@utpfund.live --password-stdin < password.txt
//!
//! # Review pending withdrawals whose holder matches a pattern
//! utp-admin withdrawals list --status pending --search 'rao|iyer'
//!
//! # Decide on a request
//! utp-admin withdrawals approve 665f1c... --remarks "UPI ref 4471"
//! utp-admin withdrawals reject 665f1c... --reason "UPI ID does not match"
//!
//! # Game rooms
//! utp-admin rooms number create --entry-fee 100 --max-players 20
//! utp-admin rooms number close NR-1042
//! ```
//!
//! # Environment Variables
//!
//! - `UTP_API_BASE_URL` - Platform API root (default `https://api.utpfund.live/api`)
//! - `UTP_SESSION_FILE` - Where the session is kept between runs
//! - `UTP_PAGE_SIZE` - Rows per page (default 10)
//! - `UTP_REQUEST_TIMEOUT_SECS` - Per-request timeout (default none)
//! - `UTP_LOG_JSON` - Log JSON lines instead of text
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - Error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utpfund_admin::ConsoleConfig;
use utpfund_core::{RequestStatus, RoomStatus, TransactionType};

mod commands;
mod error;
mod output;

use commands::Console;
use error::CliError;

#[derive(Parser)]
#[command(name = "utp-admin")]
#[command(version, about = "UTP Fund admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        /// Admin email address
        email: String,

        /// Admin password
        #[arg(long, env = "UTP_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Read the password from the first line of stdin
        #[arg(long, conflicts_with = "password")]
        password_stdin: bool,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// Platform statistics and the financial overview
    Dashboard,
    /// Registered users
    Customers {
        #[command(subcommand)]
        action: CustomersAction,
    },
    /// Deposit requests awaiting a decision
    Deposits {
        #[command(subcommand)]
        action: DepositsAction,
    },
    /// Withdrawal requests awaiting a decision
    Withdrawals {
        #[command(subcommand)]
        action: WithdrawalsAction,
    },
    /// Wallet ledger
    Transactions {
        #[command(subcommand)]
        action: TransactionsAction,
    },
    /// Game rooms
    Rooms {
        #[command(subcommand)]
        game: RoomGame,
    },
}

/// Search and paging shared by every list command.
#[derive(Args, Debug, Clone)]
struct ListArgs {
    /// Case-insensitive pattern matched against names and emails
    #[arg(short, long)]
    search: Option<String>,

    /// Page to show (clamped to the last page)
    #[arg(short, long, default_value_t = 1)]
    page: usize,
}

#[derive(Subcommand)]
enum CustomersAction {
    /// List customers
    List {
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand)]
enum DepositsAction {
    /// List deposit requests
    List {
        /// Only requests in this state
        #[arg(long)]
        status: Option<RequestStatus>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Approve a deposit and credit the user's wallet
    Approve {
        id: String,
        /// Note stored with the decision
        #[arg(long)]
        remarks: Option<String>,
    },
    /// Reject a deposit
    Reject {
        id: String,
        /// Reason shown to the user
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand)]
enum WithdrawalsAction {
    /// List withdrawal requests
    List {
        /// Only requests in this state
        #[arg(long)]
        status: Option<RequestStatus>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Approve a withdrawal once it has been paid out
    Approve {
        id: String,
        /// Note stored with the decision (e.g. payment reference)
        #[arg(long)]
        remarks: Option<String>,
    },
    /// Reject a withdrawal; a reason is required
    Reject {
        id: String,
        /// Reason shown to the user
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand)]
enum TransactionsAction {
    /// List ledger entries
    List {
        /// Only entries of this type
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Revenue, withdrawals and net over the matching entries
    Summary {
        /// Only entries of this type
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        /// Case-insensitive pattern matched against names and emails
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum RoomGame {
    /// Color prediction rooms
    Color {
        #[command(subcommand)]
        action: ColorRoomsAction,
    },
    /// Number prediction rooms
    Number {
        #[command(subcommand)]
        action: NumberRoomsAction,
    },
}

#[derive(Subcommand)]
enum ColorRoomsAction {
    /// List color rooms
    List {
        #[arg(long)]
        status: Option<RoomStatus>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Open a new color room
    Create {
        /// Entry fee in rupees (default 50)
        #[arg(long)]
        entry_fee: Option<Decimal>,
        /// Benefit fee multiplier (default 1)
        #[arg(long)]
        benefit_fee_multiplier: Option<Decimal>,
        /// Prize in rupees (default 100)
        #[arg(long)]
        winning_amount: Option<Decimal>,
        /// Seats in the room (default 3)
        #[arg(long)]
        max_players: Option<u32>,
        /// Comma-separated colors (default red,green,blue,yellow)
        #[arg(long, value_delimiter = ',')]
        colors: Option<Vec<String>>,
    },
}

#[derive(Subcommand)]
enum NumberRoomsAction {
    /// List number rooms
    List {
        #[arg(long)]
        status: Option<RoomStatus>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Open a new number room
    Create {
        /// Entry fee in rupees (default 50)
        #[arg(long)]
        entry_fee: Option<Decimal>,
        /// Payout multiplier (default 2)
        #[arg(long)]
        winning_multiplier: Option<Decimal>,
        /// Seats in the room (default 10)
        #[arg(long)]
        max_players: Option<u32>,
    },
    /// Close a room to new players
    Close { room_id: String },
    /// Delete a room
    Delete { room_id: String },
    /// Change a room's settings
    Update {
        room_id: String,
        #[arg(long)]
        entry_fee: Option<Decimal>,
        #[arg(long)]
        winning_multiplier: Option<Decimal>,
        #[arg(long)]
        max_players: Option<u32>,
    },
    /// Players, bets and result of one room
    Details { room_id: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(config: &ConsoleConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "utpfund_admin=info,utpfund_cli=info".into());

    // Logs go to stderr; stdout carries command output
    let json_layer = config.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!config.log_json)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(std::io::stderr().lock(), "utp-admin: {e}");
            return ExitCode::FAILURE;
        }
    };

    let sentry_guard = init_sentry(&config);
    init_tracing(&config);

    let code = match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            let mut stderr = std::io::stderr().lock();
            if e.is_unauthenticated() {
                let _ = writeln!(stderr, "Session expired, run `utp-admin login`");
            } else {
                let _ = writeln!(stderr, "utp-admin: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    };

    // Flush pending Sentry events before exiting
    drop(sentry_guard);
    code
}

async fn run(cli: Cli, config: ConsoleConfig) -> Result<(), CliError> {
    let console = Console::open(config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Login {
            email,
            password,
            password_stdin,
        } => {
            let password = if password_stdin {
                Some(commands::session::read_password_line(std::io::stdin().lock())?)
            } else {
                password
            };
            commands::session::login(&console, &mut out, &email, password).await?;
        }
        Commands::Logout => commands::session::logout(&console, &mut out)?,
        Commands::Whoami => commands::session::whoami(&console, &mut out)?,
        Commands::Dashboard => commands::ledger::dashboard(&console, &mut out).await?,
        Commands::Customers { action } => match action {
            CustomersAction::List { list } => {
                commands::ledger::customers(&console, &mut out, &list.into()).await?;
            }
        },
        Commands::Deposits { action } => match action {
            DepositsAction::List { status, list } => {
                commands::requests::list_deposits(&console, &mut out, status, &list.into())
                    .await?;
            }
            DepositsAction::Approve { id, remarks } => {
                commands::requests::approve_deposit(&console, &mut out, &id, remarks).await?;
            }
            DepositsAction::Reject { id, reason } => {
                commands::requests::reject_deposit(&console, &mut out, &id, reason).await?;
            }
        },
        Commands::Withdrawals { action } => match action {
            WithdrawalsAction::List { status, list } => {
                commands::requests::list_withdrawals(&console, &mut out, status, &list.into())
                    .await?;
            }
            WithdrawalsAction::Approve { id, remarks } => {
                commands::requests::approve_withdrawal(&console, &mut out, &id, remarks).await?;
            }
            WithdrawalsAction::Reject { id, reason } => {
                commands::requests::reject_withdrawal(&console, &mut out, &id, reason).await?;
            }
        },
        Commands::Transactions { action } => match action {
            TransactionsAction::List { kind, list } => {
                commands::ledger::transactions(&console, &mut out, kind, &list.into()).await?;
            }
            TransactionsAction::Summary { kind, search } => {
                commands::ledger::summary(&console, &mut out, kind, search).await?;
            }
        },
        Commands::Rooms { game } => match game {
            RoomGame::Color { action } => match action {
                ColorRoomsAction::List { status, list } => {
                    commands::rooms::list_color(&console, &mut out, status, &list.into()).await?;
                }
                ColorRoomsAction::Create {
                    entry_fee,
                    benefit_fee_multiplier,
                    winning_amount,
                    max_players,
                    colors,
                } => {
                    let mut room = utpfund_core::CreateColorRoom::default();
                    if let Some(fee) = entry_fee {
                        room.entry_fee = fee.into();
                    }
                    if let Some(multiplier) = benefit_fee_multiplier {
                        room.benefit_fee_multiplier = multiplier;
                    }
                    if let Some(amount) = winning_amount {
                        room.winning_amount = amount.into();
                    }
                    if let Some(max) = max_players {
                        room.max_players = max;
                    }
                    if let Some(colors) = colors {
                        room.available_colors = colors;
                    }
                    commands::rooms::create_color(&console, &mut out, room).await?;
                }
            },
            RoomGame::Number { action } => match action {
                NumberRoomsAction::List { status, list } => {
                    commands::rooms::list_number(&console, &mut out, status, &list.into()).await?;
                }
                NumberRoomsAction::Create {
                    entry_fee,
                    winning_multiplier,
                    max_players,
                } => {
                    let mut room = utpfund_core::CreateNumberRoom::default();
                    if let Some(fee) = entry_fee {
                        room.entry_fee = fee.into();
                    }
                    if let Some(multiplier) = winning_multiplier {
                        room.winning_multiplier = multiplier;
                    }
                    if let Some(max) = max_players {
                        room.max_players = max;
                    }
                    commands::rooms::create_number(&console, &mut out, room).await?;
                }
                NumberRoomsAction::Close { room_id } => {
                    commands::rooms::close_number(&console, &mut out, room_id).await?;
                }
                NumberRoomsAction::Delete { room_id } => {
                    commands::rooms::delete_number(&console, &mut out, room_id).await?;
                }
                NumberRoomsAction::Update {
                    room_id,
                    entry_fee,
                    winning_multiplier,
                    max_players,
                } => {
                    let patch = utpfund_core::NumberRoomPatch {
                        entry_fee: entry_fee.map(Into::into),
                        winning_multiplier,
                        max_players,
                    };
                    commands::rooms::update_number(&console, &mut out, room_id, patch).await?;
                }
                NumberRoomsAction::Details { room_id } => {
                    commands::rooms::details(&console, &mut out, room_id).await?;
                }
            },
        },
    }
    Ok(())
}

impl From<ListArgs> for commands::ListQuery {
    fn from(args: ListArgs) -> Self {
        Self {
            search: args.search.unwrap_or_default(),
            page: args.page,
        }
    }
}
