use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use venueflow::assist::{BookingAssistant, GeminiAssistant, summarize_or_apology};
use venueflow::calendar::{DayCell, MonthCursor};
use venueflow::gateway::{BookingBackend, InMemoryBackend, RestBackend};
use venueflow::types::{Booking, BookingId, Connectivity, FeatureCategory, User, format_time_range};
use venueflow::{BookingRequest, Config, Dashboard, catalog};

/// venueflow - venue booking dashboard
#[derive(Parser)]
#[command(name = "venueflow")]
#[command(about = "Book venues, review bookings and browse the booking calendar", long_about = None)]
struct Cli {
    /// Backend base URL (overrides VENUEFLOW_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Use a process-local backend seeded with demo data
    #[arg(long, global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Credentials {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long)]
    password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List the venue catalog
    Venues,
    /// Create an account
    Signup {
        /// Display name
        #[arg(long)]
        name: String,
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Show a month of bookings
    Calendar {
        /// Year (defaults to the current one)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current one)
        #[arg(long)]
        month: Option<u32>,
    },
    /// List your bookings, or every booking for an admin
    Bookings {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Request a booking
    Book {
        #[command(flatten)]
        credentials: Credentials,
        /// Venue id, see `venues`
        #[arg(long)]
        venue: String,
        /// Day, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Start time, HH:MM
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        /// End time, HH:MM
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        /// Feature choice as category=value, e.g. seating=VIP
        #[arg(long = "detail", value_parser = parse_detail)]
        details: Vec<(FeatureCategory, String)>,
        /// Party size for refreshments
        #[arg(long)]
        members: Option<u32>,
        /// Refreshment text when the choice is Custom
        #[arg(long)]
        custom_refreshment: Option<String>,
    },
    /// Approve a pending booking (admin)
    Confirm {
        #[command(flatten)]
        credentials: Credentials,
        /// Booking id
        id: String,
    },
    /// Decline a pending booking (admin)
    Reject {
        #[command(flatten)]
        credentials: Credentials,
        /// Booking id
        id: String,
    },
    /// Delete one of your bookings
    Cancel {
        #[command(flatten)]
        credentials: Credentials,
        /// Booking id
        id: String,
    },
    /// Describe a booking in plain words
    Summarize {
        #[command(flatten)]
        credentials: Credentials,
        /// Booking id
        id: String,
    },
    /// Suggest a venue and details for a request
    Suggest {
        /// Day of the event, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// What you need, in your own words
        prompt: String,
        /// Submit the suggestion as a booking request
        #[arg(long, requires_all = ["start", "end", "email", "password"])]
        book: bool,
        /// Start time when booking, HH:MM
        #[arg(long, value_parser = parse_time)]
        start: Option<NaiveTime>,
        /// End time when booking, HH:MM
        #[arg(long, value_parser = parse_time)]
        end: Option<NaiveTime>,
        /// Account email when booking
        #[arg(long)]
        email: Option<String>,
        /// Account password when booking
        #[arg(long)]
        password: Option<String>,
    },
}

fn parse_time(text: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(text, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

fn parse_detail(text: &str) -> Result<(FeatureCategory, String), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| "expected category=value".to_string())?;
    let category = FeatureCategory::parse(key.trim()).ok_or_else(|| format!("unknown feature '{key}'"))?;
    Ok((category, value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "venueflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let backend: Arc<dyn BookingBackend> = if cli.in_memory {
        Arc::new(InMemoryBackend::seeded())
    } else {
        let url = cli.api_url.clone().unwrap_or_else(|| config.backend.url.clone());
        tracing::info!(url = %url, "Using REST backend");
        Arc::new(RestBackend::new(url))
    };
    let dashboard = Dashboard::new(backend, config.backend.response_wait());

    let result = run(&dashboard, &config, cli.command).await;

    if let Err(error) = dashboard.shutdown(Duration::from_secs(5)).await {
        tracing::warn!(error = %error, "Dashboard did not shut down cleanly");
    }

    result
}

async fn run(dashboard: &Dashboard, config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Venues => {
            print_venues();
            Ok(())
        },
        Commands::Signup { name, credentials } => {
            refresh(dashboard).await?;
            let user = dashboard
                .sign_up(&name, &credentials.email, &credentials.password)
                .await?;
            println!("Welcome, {}! Account {} created.", user.name, user.id);
            Ok(())
        },
        Commands::Calendar { year, month } => {
            refresh(dashboard).await?;
            let current = dashboard.current_month();
            let cursor = MonthCursor::new(year.unwrap_or(current.year()), month.unwrap_or(current.month()))?;
            print_calendar(dashboard, cursor).await;
            Ok(())
        },
        Commands::Bookings { credentials } => {
            let user = sign_in(dashboard, &credentials).await?;
            let bookings = if user.is_admin() {
                dashboard.bookings().await
            } else {
                dashboard.my_bookings().await
            };
            if bookings.is_empty() {
                println!("You have no upcoming bookings.");
            }
            for booking in &bookings {
                print_booking(booking);
            }
            Ok(())
        },
        Commands::Book {
            credentials,
            venue,
            date,
            start,
            end,
            details,
            members,
            custom_refreshment,
        } => {
            sign_in(dashboard, &credentials).await?;
            let mut request = BookingRequest::new(venue, date, start, end);
            for (category, value) in details {
                request = request.with_selection(category, value);
            }
            if let Some(members) = members {
                request = request.with_members(members);
            }
            if let Some(text) = custom_refreshment {
                request = request.with_custom_refreshment(text);
            }
            let booking = dashboard.submit_booking(request).await?;
            println!("Booking {} submitted and awaiting approval.", booking.id);
            print_booking(&booking);
            Ok(())
        },
        Commands::Confirm { credentials, id } => {
            sign_in(dashboard, &credentials).await?;
            let booking = dashboard.confirm_booking(&BookingId::new(id)).await?;
            print_booking(&booking);
            Ok(())
        },
        Commands::Reject { credentials, id } => {
            sign_in(dashboard, &credentials).await?;
            let booking = dashboard.reject_booking(&BookingId::new(id)).await?;
            print_booking(&booking);
            Ok(())
        },
        Commands::Cancel { credentials, id } => {
            sign_in(dashboard, &credentials).await?;
            dashboard.cancel_booking(&BookingId::new(id.clone())).await?;
            println!("Booking {id} cancelled.");
            Ok(())
        },
        Commands::Summarize { credentials, id } => {
            let assistant = assistant(config)?;
            sign_in(dashboard, &credentials).await?;
            let booking = dashboard
                .booking(&BookingId::new(id.clone()))
                .await
                .ok_or_else(|| anyhow!("booking {id} not found"))?;
            println!("{}", summarize_or_apology(&assistant, &booking).await);
            Ok(())
        },
        Commands::Suggest {
            date,
            prompt,
            book,
            start,
            end,
            email,
            password,
        } => {
            let suggestion = assistant(config)?.suggest(&prompt, date).await?;
            let venue = catalog::lookup(&suggestion.venue_id)?;
            println!("{} ({})", venue.name, venue.id);
            for (key, value) in &suggestion.details {
                println!("  {key}: {value}");
            }

            if let (true, Some(start), Some(end), Some(email), Some(password)) = (book, start, end, email, password) {
                sign_in(dashboard, &Credentials { email, password }).await?;
                let request = BookingRequest::from_suggestion(&suggestion, date, start, end);
                let booking = dashboard.submit_booking(request).await?;
                println!("Booking {} submitted and awaiting approval.", booking.id);
                print_booking(&booking);
            }
            Ok(())
        },
    }
}

fn assistant(config: &Config) -> Result<GeminiAssistant> {
    let client = config
        .gemini
        .client()
        .context("GEMINI_API_KEY is not set; AI features are unavailable")?;
    Ok(GeminiAssistant::new(client))
}

async fn refresh(dashboard: &Dashboard) -> Result<Connectivity> {
    let connectivity = dashboard.refresh().await?;
    if !connectivity.is_online() {
        eprintln!("Backend unreachable: showing demo data, changes are disabled.");
    }
    Ok(connectivity)
}

async fn sign_in(dashboard: &Dashboard, credentials: &Credentials) -> Result<User> {
    refresh(dashboard).await?;
    let user = dashboard.login(&credentials.email, &credentials.password).await?;
    tracing::debug!(user_id = %user.id, role = ?user.role, "Signed in");
    Ok(user)
}

fn print_venues() {
    for venue in catalog::all() {
        let capacity = venue.capacity.map_or_else(|| "-".to_string(), |c| c.to_string());
        let price = venue.base_price.map_or_else(|| "-".to_string(), |p| format!("₹{p}"));
        println!("{:<12} {:<24} capacity {capacity:<5} from {price}", venue.id, venue.name);
        for feature in venue.features {
            let options = venue.options_for(*feature);
            if options.is_empty() {
                println!("    {feature}");
            } else {
                println!("    {feature}: {}", options.join(", "));
            }
        }
    }
}

fn print_booking(booking: &Booking) {
    let venue = catalog::lookup(&booking.venue_id).map_or("Unknown Venue", |venue| venue.name);
    println!(
        "#{:<4} {:<10} {venue:<24} {}  booked by {}",
        booking.id,
        booking.status,
        format_time_range(booking.booking_date_time, booking.end_time),
        booking.booked_by,
    );
    for (key, value) in &booking.details {
        println!("        {key}: {value}");
    }
}

async fn print_calendar(dashboard: &Dashboard, cursor: MonthCursor) {
    let lines = dashboard
        .with_month(cursor, |grid| {
            let mut lines = vec![
                format!("{} {}", cursor.month_name(), cursor.year()),
                " Sun  Mon  Tue  Wed  Thu  Fri  Sat".to_string(),
            ];
            let mut row = String::new();
            let mut listed = Vec::new();
            for (index, cell) in grid.iter().enumerate() {
                match cell {
                    DayCell::Blank => row.push_str("     "),
                    DayCell::Day { day, bookings, .. } => {
                        let mark = if bookings.is_empty() { ' ' } else { '*' };
                        let _ = write!(row, " {day:>3}{mark}");
                        listed.extend(bookings.iter().map(|booking| {
                            let venue = catalog::lookup(&booking.venue_id).map_or("Unknown Venue", |venue| venue.short_name());
                            format!(
                                "  {day:>2}: {venue} {} ({})",
                                format_time_range(booking.booking_date_time, booking.end_time),
                                booking.status
                            )
                        }));
                    },
                }
                if index % 7 == 6 {
                    lines.push(std::mem::take(&mut row));
                }
            }
            if !row.is_empty() {
                lines.push(row);
            }
            lines.extend(listed);
            lines
        })
        .await;

    for line in lines {
        println!("{line}");
    }
}
