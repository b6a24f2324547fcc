use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use employee_directory::{config::Config, db, handlers};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    // Initialize the employee store
    let store = db::connect_store(&config).await?;
    let store_data = web::Data::from(store.clone());

    info!("Starting server at {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store_data.clone())
            .configure(handlers::configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await?;

    store.close().await;
    info!("Server stopped");
    Ok(())
}
