use std::sync::Arc;

use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use taskboard_core::domain::{NewSubtask, NewTask, NewUser, Status, TaskFilter};
use taskboard_core::impls::InMemoryEntityStore;
use taskboard_core::{ServiceBuilder, ServiceConfig, TaskboardService};

fn print_json<T: Serialize>(label: &str, value: &T) -> Result<(), serde_json::Error> {
    println!("{label}:\n{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Walk one Task through its lifecycle, including a rejected completion.
async fn demo(service: &TaskboardService) -> Result<(), Box<dyn std::error::Error>> {
    let owner = service
        .create_user(NewUser::new("Ada Lovelace", "ada@example.com"))
        .await?;
    print_json("user", &owner)?;

    if let Err(err) = service
        .create_user(NewUser::new("Ada Again", "ada@example.com"))
        .await
    {
        println!("duplicate user rejected ({:?}): {err}", err.kind());
    }

    let task = service
        .create_task(NewTask::new(owner.id, "Project Alpha").with_description("first release"))
        .await?;
    service
        .create_task(NewTask::new(owner.id, "project beta"))
        .await?;
    service.create_task(NewTask::new(owner.id, "Other")).await?;

    let docs = service
        .create_subtask(task.id, NewSubtask::new("Write docs"))
        .await?;
    let tests = service
        .create_subtask(task.id, NewSubtask::new("Write tests"))
        .await?;
    service
        .update_subtask_status(tests.id, Status::Completed)
        .await?;

    // (1) one Subtask still pending: rejected
    match service.update_task_status(task.id, Status::Completed).await {
        Ok(view) => print_json("unexpectedly completed", &view)?,
        Err(err) => println!("completion rejected ({:?}): {err}", err.kind()),
    }

    // (2) finish the last Subtask, then complete
    service
        .update_subtask_status(docs.id, Status::Completed)
        .await?;
    let completed = service
        .update_task_status(task.id, Status::Completed)
        .await?;
    print_json("completed task", &completed)?;

    let found = service
        .search_tasks(&TaskFilter::default().with_title("proj"), None)
        .await?;
    print_json("search title=proj", &found)?;

    let subtasks = service.list_subtasks_of_task(task.id, None).await?;
    print_json("subtasks", &subtasks)?;

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("configuration error: {error}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        default_page_size = config.default_page_size,
        max_page_size = config.max_page_size,
        "configuration loaded"
    );

    let store = Arc::new(InMemoryEntityStore::new());
    let service = match ServiceBuilder::new(store.clone(), store).config(config).build() {
        Ok(service) => service,
        Err(error) => {
            tracing::error!("failed to build service: {error}");
            std::process::exit(1);
        }
    };

    if let Err(error) = demo(&service).await {
        tracing::error!("demo failed: {error}");
        std::process::exit(1);
    }
}
