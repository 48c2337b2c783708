//! querypad - a console client for a natural-language query service.
//!
//! Login, registration, and password recovery pages gate a query form
//! behind a client-side session; every page transition runs through the
//! navigation guard and every request carries the session's bearer token.

mod api;
mod app;
mod auth;
mod config;
mod router;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use auth::FileStorage;
use config::Config;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("querypad starting");

    let config = Config::load()?;
    let mut app = App::new(&config)?;

    // Resume a saved session if it is still fresh; otherwise the guard
    // bounces us to the login page.
    app.navigate("/query")?;

    loop {
        match app.current_route().name {
            "Login" => {
                if !login_page(&mut app).await? {
                    break;
                }
            }
            "QueryForm" => {
                if !query_page(&mut app).await? {
                    break;
                }
            }
            "Register" => register_page(&mut app).await?,
            "ForgotPassword" => forgot_password_page(&mut app).await?,
            other => {
                anyhow::bail!("No page handler for route {}", other);
            }
        }
    }

    info!("querypad shutting down");
    Ok(())
}

/// Returns false when the user wants to quit.
async fn login_page(app: &mut App<FileStorage>) -> Result<bool> {
    println!("-- login (blank to quit, :register, :forgot) --");
    let username = prompt("username: ")?;
    match username.as_str() {
        "" => return Ok(false),
        ":register" => {
            app.navigate("/register")?;
            return Ok(true);
        }
        ":forgot" => {
            app.navigate("/forgot-password")?;
            return Ok(true);
        }
        _ => {}
    }

    let password = rpassword::prompt_password("password: ")?;
    match app.login(&username, &password).await {
        Ok(()) => app.navigate("/query")?,
        Err(e) => eprintln!("Login failed: {:#}", e),
    }
    Ok(true)
}

/// Returns false when the user wants to quit.
async fn query_page(app: &mut App<FileStorage>) -> Result<bool> {
    let sentence = prompt("query (blank to quit, :logout, :suggest)> ")?;
    match sentence.as_str() {
        "" => return Ok(false),
        ":logout" => {
            app.logout()?;
            app.navigate("/")?;
            return Ok(true);
        }
        ":suggest" => {
            let content = prompt("suggestion: ")?;
            if !content.is_empty() {
                match app.send_suggestion(&content).await {
                    Ok(ack) => println!("{}", ack.message.as_deref().unwrap_or("Thanks!")),
                    Err(e) => eprintln!("Failed to send suggestion: {:#}", e),
                }
            }
        }
        _ => match app.run_query(&sentence).await {
            Ok(response) => print_results(&response),
            Err(e) => eprintln!("Query failed: {:#}", e),
        },
    }

    // Re-run the guard so a session that expired mid-use bounces back to
    // the login page on the next iteration.
    app.navigate("/query")?;
    Ok(true)
}

async fn register_page(app: &mut App<FileStorage>) -> Result<()> {
    println!("-- register --");
    let username = prompt("username: ")?;
    if !username.is_empty() {
        let email = prompt("email: ")?;
        let password = rpassword::prompt_password("password: ")?;
        match app.register(&username, &password, &email).await {
            Ok(ack) => println!("{}", ack.message.as_deref().unwrap_or("Account created")),
            Err(e) => eprintln!("Registration failed: {:#}", e),
        }
    }
    app.navigate("/")
}

async fn forgot_password_page(app: &mut App<FileStorage>) -> Result<()> {
    println!("-- password recovery --");
    let username = prompt("username: ")?;
    if !username.is_empty() {
        match app.forgot_password(&username).await {
            Ok(ack) => println!("{}", ack.message.as_deref().unwrap_or("Recovery mail sent")),
            Err(e) => eprintln!("Password recovery failed: {:#}", e),
        }
    }
    app.navigate("/")
}

fn print_results(response: &api::QueryResponse) {
    println!("sql: {}", response.sql);
    println!("{}", response.headers.join("\t"));
    for row in &response.result {
        let cells: Vec<String> = response
            .headers
            .iter()
            .map(|h| match row.get(h) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(v) => v.to_string(),
                None => String::new(),
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
    println!("{} row(s)", response.result.len());
}
