use std::sync::Arc;

use chrono::Local;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agenda::error::AppError;
use agenda::state::AppState;
use agenda::supabase::{SupabaseClient, SupabaseConfig, SupabaseHttpClient};
use agenda::timeline::{self, TimelineItem, TimelinePager};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "agenda=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = SupabaseConfig::new_from_env()?;
    let client: Arc<dyn SupabaseClient> = Arc::new(SupabaseHttpClient::new(config)?);

    let user = client
        .current_user()
        .await?
        .ok_or(AppError::AuthenticationRequired)?;
    info!("signed in as {}", user.email.as_deref().unwrap_or(&user.id));

    let mut state = AppState::new(client, user);
    state.load().await;
    if let Some(err) = state.agenda.error() {
        eprintln!("An error has occurred: {err}");
        return Ok(());
    }

    let today = Local::now().date_naive();
    let full_timeline = state.timeline(today);
    let pager = TimelinePager::anchored(&full_timeline, today);

    for item in pager.visible(&full_timeline) {
        match item {
            TimelineItem::Date(section) => {
                println!("{}", section.label);
                for assignment in &section.assignments {
                    println!(
                        "  [{}] {} ({}, due {})",
                        if assignment.checked { "x" } else { " " },
                        assignment.assignment_name,
                        assignment.course.course_name,
                        timeline::time_label(assignment.due_date),
                    );
                }
            }
            TimelineItem::Gap(gap) => println!("  ... {}", gap.label),
        }
    }

    Ok(())
}
