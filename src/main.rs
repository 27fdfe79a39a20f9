use std::collections::BTreeMap;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stacktrail::core::questions::{CHECKUP_QUESTIONS, validate_answers};
use stacktrail::{ApiError, CheckupClient, Config};

#[derive(Debug, Parser)]
#[command(
    name = "stacktrail",
    about = "Command-line client for the Stacktrail cyber checkup service"
)]
struct Cli {
    /// Backend API prefix, e.g. https://checkup.example.com/api
    #[arg(long, value_name = "url", env = "STACKTRAIL_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        username: String,
        #[arg(long, env = "STACKTRAIL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        username: String,
        #[arg(long, env = "STACKTRAIL_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// List organizations
    Orgs,
    /// Show the latest score of every organization
    Dashboard,
    /// Print the checkup questionnaire
    Questions,
    /// Submit answers (`key=value` pairs) for an assessment
    Submit {
        assessment_id: i64,
        #[arg(value_parser = parse_answer)]
        answers: Vec<(String, String)>,
    },
}

fn parse_answer(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }

    match run(&config, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config, command: Command) -> Result<(), ApiError> {
    let client = CheckupClient::native(config)?;

    match command {
        Command::Login { username, password } => {
            client.login(&username, &password).await?;
            println!("Signed in as {}", username.trim());
        }
        Command::Register {
            username,
            password,
            email,
        } => {
            client
                .register(&username, &password, email.as_deref())
                .await?;
            println!("Registered and signed in as {}", username.trim());
        }
        Command::Logout => {
            client.logout();
            println!("Signed out");
        }
        Command::Status => {
            println!("{} ({})", client.status(), config.api_base);
        }
        Command::Orgs => {
            for org in client.gateway().list_orgs().await? {
                println!("{:>5}  {}  <{}>", org.id, org.name, org.primary_domain);
            }
        }
        Command::Dashboard => {
            for org in client.gateway().dashboard_summary().await? {
                match org.latest_assessment {
                    Some(latest) => println!(
                        "{:>5}  {:<30} {:>3}  {}",
                        org.id, org.name, latest.score, latest.risk_band
                    ),
                    None => println!("{:>5}  {:<30}   -  not assessed", org.id, org.name),
                }
            }
        }
        Command::Questions => {
            for question in CHECKUP_QUESTIONS {
                let options: Vec<&str> = question.options.iter().map(|o| o.as_str()).collect();
                println!("{:<24} {}  [{}]", question.key, question.label, options.join("/"));
            }
        }
        Command::Submit {
            assessment_id,
            answers,
        } => {
            let answers: BTreeMap<String, String> = answers.into_iter().collect();
            validate_answers(&answers)?;
            let assessment = client
                .gateway()
                .submit_assessment(assessment_id, &answers)
                .await?;
            println!(
                "Score {} ({}), estimated breach cost ${}-${}",
                assessment.score,
                assessment.risk_band,
                assessment.breach_cost_low,
                assessment.breach_cost_high
            );
        }
    }

    Ok(())
}
