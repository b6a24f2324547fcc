use dotenv::dotenv;
use employee_directory::{config::Config, db, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let store = db::connect_store(&config).await?;

    let employee = seed::seed_demo_data(store.as_ref()).await?;
    println!("{}", serde_json::to_string_pretty(&employee)?);

    store.close().await;
    Ok(())
}
