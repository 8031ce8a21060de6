mod api;
mod config;
mod database;
mod jobs;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use std::io;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::database::MongoDB;

/// One-shot commands run instead of the HTTP server
enum Maintenance {
    RecalculatePoints,
    MigrateLegacy,
}

impl Maintenance {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "recalculate-points" => Some(Self::RecalculatePoints),
            "migrate-legacy" => Some(Self::MigrateLegacy),
            _ => None,
        }
    }

    async fn run(self, db: &MongoDB) -> io::Result<()> {
        let result = match self {
            Self::RecalculatePoints => jobs::recalculate_points::recalculate_all_points(db)
                .await
                .map(|report| log::info!("📊 {:?}", report)),
            Self::MigrateLegacy => jobs::migrate_legacy::migrate_legacy_records(db)
                .await
                .map(|report| log::info!("📊 {:?}", report)),
        };

        result.map_err(|e| {
            log::error!("❌ Maintenance job failed: {}", e);
            io::Error::other(e.to_string())
        })
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::other(e)
    })?;

    let maintenance = match env::args().nth(1) {
        Some(arg) => match Maintenance::from_arg(&arg) {
            Some(job) => Some(job),
            None => {
                log::error!("❌ Unknown command '{}'. Expected: recalculate-points | migrate-legacy", arg);
                return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("unknown command: {}", arg)));
            }
        },
        None => None,
    };

    log::info!("🚀 Starting Bootcamp Service...");
    log::info!("📊 Database: {}", config.database_name);

    let db = MongoDB::new(&config.database_url, &config.database_name)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            io::Error::other(e.to_string())
        })?;

    log::info!("✅ MongoDB connected successfully");

    if let Some(job) = maintenance {
        return job.run(&db).await;
    }

    let db_data = web::Data::new(db);
    let bind_address = config.bind_address();

    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);
    log::info!("📄 OpenAPI spec at: http://{}/api-docs/openapi.json", bind_address);

    let cors_origins = config.cors_origins.clone();

    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CACHE_CONTROL,
            ])
            .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            // Base64 profile pictures exceed the default JSON limit
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024))
            .wrap(cors)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            // Health & metrics
            .route("/health", web::get().to(api::health::health_check))
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            .route("/metrics/storage", web::get().to(api::metrics::get_storage_metrics))
            // Auth
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(api::auth::signup))
                    .route("/login", web::post().to(api::auth::login))
            )
            // Profiles
            .service(
                web::scope("/profile")
                    .route("", web::get().to(api::profile::get_profile))
                    .route("", web::put().to(api::profile::update_profile))
                    .route("/image", web::put().to(api::profile::update_profile_picture))
                    .route("/role/{account_type}", web::get().to(api::profile::get_by_role))
            )
            .route("/group/{mentor_name}", web::get().to(api::profile::get_group_members))
            .route("/leaderboard", web::get().to(api::profile::get_leaderboard))
            // Bucket lists
            .service(
                web::scope("/bucketlist")
                    .route("/bucket_lists", web::get().to(api::bucket_list::get_all_bucket_lists))
                    .route("/bucket_lists/{mentor_name}", web::get().to(api::bucket_list::list_tasks))
                    .route("/{mentor_name}/bucket_lists", web::get().to(api::bucket_list::get_bucket_list))
                    .route("/{mentor_name}/bucket_lists", web::post().to(api::bucket_list::add_task))
                    .route(
                        "/{mentor_name}/bucket_lists/complete/{task_id}",
                        web::put().to(api::bucket_list::complete_task),
                    )
                    .route(
                        "/{mentor_name}/bucket_lists/toggle/{task_id}",
                        web::put().to(api::bucket_list::toggle_task),
                    )
                    .route(
                        "/{mentor_name}/bucket_lists/task/{task_id}",
                        web::delete().to(api::bucket_list::delete_task),
                    )
            )
            // Images; "/user/{id}" before the "/{id}" catch-all
            .service(
                web::scope("/images")
                    .route("/upload", web::post().to(api::images::upload_image))
                    .route("/user/{user_id}", web::get().to(api::images::list_user_images))
                    .route("/{image_id}", web::get().to(api::images::get_image))
                    .route("/{image_id}", web::delete().to(api::images::delete_image))
            )
    })
    .bind(bind_address)?
    .run()
    .await
}
