use clap::{Parser, Subcommand};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "A CLI for browsing and managing regional listings")]
struct Cli {
    /// Base URL for the Vitrine service
    #[arg(long, default_value = "http://localhost:3000")]
    service_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List upcoming events
    Events {
        /// Comma-separated categories, e.g. "Show,Feira"
        #[arg(short, long)]
        categories: Option<String>,
        /// Comma-separated listing sources
        #[arg(short, long)]
        sources: Option<String>,
        /// Free-text search over title, date and location
        #[arg(short, long)]
        query: Option<String>,
        /// Only events starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
        /// Include events that already ended
        #[arg(long)]
        include_past: bool,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// List published tourist places
    Places {
        #[arg(short, long)]
        categories: Option<String>,
        /// Comma-separated city names
        #[arg(long)]
        cities: Option<String>,
        /// Comma-separated neighborhood names
        #[arg(long)]
        neighborhoods: Option<String>,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// List validated service providers
    Services {
        /// Comma-separated main services, e.g. "Eletricista"
        #[arg(short, long)]
        categories: Option<String>,
        #[arg(long)]
        cities: Option<String>,
        #[arg(long)]
        neighborhoods: Option<String>,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Add an event to the listing
    AddEvent {
        title: String,
        /// Link to the event page
        #[arg(long)]
        link: String,
        /// Start instant, RFC 3339 (e.g. 2026-09-01T19:00:00)
        #[arg(long)]
        date: String,
        /// End instant for multi-day events
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        uf: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        location: Option<String>,
    },
    /// Approve a pending service as an admin
    ValidateService {
        /// Service to approve
        id: i32,
        /// External identity of the approving admin
        #[arg(long)]
        admin: String,
    },
}

#[derive(Serialize)]
struct NewEvent {
    title: String,
    link: String,
    date: String,
    end_date: Option<String>,
    uf: String,
    category: String,
    source: String,
    location: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Events {
            categories,
            sources,
            query,
            start_date,
            include_past,
            limit,
            offset,
        } => {
            let mut params = vec![
                ("limit".to_string(), limit.to_string()),
                ("offset".to_string(), offset.to_string()),
            ];
            push_param(&mut params, "categories", categories);
            push_param(&mut params, "sources", sources);
            push_param(&mut params, "q", query);
            push_param(&mut params, "start_date", start_date);
            if include_past {
                params.push(("include_past".to_string(), "true".to_string()));
            }
            list_listings(&client, &cli.service_url, "events", &params, |item| {
                format!(
                    "#{} {} [{}] {}{}",
                    item["id"],
                    item["date"].as_str().unwrap_or("?"),
                    item["category"].as_str().unwrap_or("?"),
                    item["title"].as_str().unwrap_or("?"),
                    if item["highlighted"].as_bool().unwrap_or(false) {
                        " *"
                    } else {
                        ""
                    },
                )
            })
            .await?;
        }
        Commands::Places {
            categories,
            cities,
            neighborhoods,
            query,
            limit,
            offset,
        } => {
            let mut params = vec![
                ("limit".to_string(), limit.to_string()),
                ("offset".to_string(), offset.to_string()),
            ];
            push_param(&mut params, "categories", categories);
            push_param(&mut params, "cities", cities);
            push_param(&mut params, "neighborhoods", neighborhoods);
            push_param(&mut params, "q", query);
            list_listings(&client, &cli.service_url, "places", &params, |item| {
                format!(
                    "#{} {} ({})",
                    item["id"],
                    item["place_name"].as_str().unwrap_or("?"),
                    item["city"].as_str().unwrap_or("?"),
                )
            })
            .await?;
        }
        Commands::Services {
            categories,
            cities,
            neighborhoods,
            query,
            limit,
            offset,
        } => {
            let mut params = vec![
                ("limit".to_string(), limit.to_string()),
                ("offset".to_string(), offset.to_string()),
            ];
            push_param(&mut params, "categories", categories);
            push_param(&mut params, "cities", cities);
            push_param(&mut params, "neighborhoods", neighborhoods);
            push_param(&mut params, "q", query);
            list_listings(&client, &cli.service_url, "services", &params, |item| {
                format!(
                    "#{} {} - {} ({})",
                    item["id"],
                    item["main_service"].as_str().unwrap_or("?"),
                    item["title"].as_str().unwrap_or("?"),
                    item["city"].as_str().unwrap_or("?"),
                )
            })
            .await?;
        }
        Commands::AddEvent {
            title,
            link,
            date,
            end_date,
            uf,
            category,
            source,
            location,
        } => {
            let payload = NewEvent {
                title,
                link,
                date,
                end_date,
                uf,
                category,
                source,
                location,
            };
            add_event(&client, &cli.service_url, &payload).await?;
        }
        Commands::ValidateService { id, admin } => {
            validate_service(&client, &cli.service_url, id, &admin).await?;
        }
    }

    Ok(())
}

fn push_param(params: &mut Vec<(String, String)>, name: &str, value: Option<String>) {
    if let Some(value) = value {
        params.push((name.to_string(), value));
    }
}

async fn list_listings(
    client: &Client,
    service_url: &str,
    kind: &str,
    params: &[(String, String)],
    render: impl Fn(&Value) -> String,
) -> Result<(), Box<dyn Error>> {
    let endpoint = format!("{service_url}/api/v1/{kind}");

    let response = client.get(&endpoint).query(params).send().await?;

    if !response.status().is_success() {
        eprintln!("Failed to list {kind}: {}", response.status());
        eprintln!("Response: {}", response.text().await?);
        return Ok(());
    }

    let body: Value = response.json().await?;
    let items = body["items"].as_array().cloned().unwrap_or_default();

    for item in &items {
        println!("{}", render(item));
    }
    println!(
        "{} of {} {kind} (offset {})",
        items.len(),
        body["total"],
        body["offset"]
    );

    Ok(())
}

async fn add_event(
    client: &Client,
    service_url: &str,
    payload: &NewEvent,
) -> Result<(), Box<dyn Error>> {
    let endpoint = format!("{service_url}/api/v1/events");

    let response = client.post(&endpoint).json(payload).send().await?;

    if response.status().is_success() {
        let created: Value = response.json().await?;
        println!("Event added successfully with ID: {}", created["id"]);
    } else {
        eprintln!("Failed to add event: {}", response.status());
        eprintln!("Response: {}", response.text().await?);
    }

    Ok(())
}

async fn validate_service(
    client: &Client,
    service_url: &str,
    id: i32,
    admin_external_id: &str,
) -> Result<(), Box<dyn Error>> {
    let endpoint = format!("{service_url}/api/v1/services/{id}/validate");

    let response = client
        .post(&endpoint)
        .json(&serde_json::json!({ "admin_external_id": admin_external_id }))
        .send()
        .await?;

    if response.status().is_success() {
        println!("Service {id} validated");
    } else {
        eprintln!("Failed to validate service {id}: {}", response.status());
        eprintln!("Response: {}", response.text().await?);
    }

    Ok(())
}
