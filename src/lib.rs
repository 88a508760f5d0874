pub mod application;
pub mod cache;
pub mod codec;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::path::{Path, PathBuf};

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use domain::ports::OrderRepository;
use handlers::orders::FrontDir;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(handlers::orders::get_order),
    components(schemas(
        domain::order::Order,
        domain::order::Delivery,
        domain::order::Payment,
        domain::order::Item
    )),
    tags((name = "orders", description = "Order lookups"))
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server<R: OrderRepository>(
    service: OrderService<R>,
    front_dir: PathBuf,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(service);
    let front = web::Data::new(FrontDir(front_dir));

    Ok(HttpServer::new(move || {
        let static_dir = front.0.clone();
        App::new()
            .app_data(service.clone())
            .app_data(front.clone())
            .wrap(Logger::default())
            .configure(|cfg| order_routes::<R>(cfg, &static_dir))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}

/// `/order/` lookup page, `/order/{order_uid}` lookups and `/static/` assets.
pub fn order_routes<R: OrderRepository>(cfg: &mut web::ServiceConfig, static_dir: &Path) {
    cfg.service(
        web::scope("/order")
            .route("/", web::get().to(handlers::orders::index))
            .route("/{order_uid}", web::get().to(handlers::orders::get_order::<R>)),
    )
    .service(Files::new("/static", static_dir));
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test};

    use super::*;
    use crate::cache::OrderCache;
    use crate::infrastructure::memory::InMemoryOrderRepository;

    const FRONT: &str = "front";

    async fn get(uri: &str) -> (StatusCode, String) {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let cache = Arc::new(OrderCache::new(NonZeroUsize::new(2).expect("non-zero")));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(OrderService::new(repo, cache)))
                .app_data(web::Data::new(FrontDir(PathBuf::from(FRONT))))
                .configure(|cfg| {
                    order_routes::<InMemoryOrderRepository>(cfg, Path::new(FRONT))
                }),
        )
        .await;

        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[actix_web::test]
    async fn static_assets_are_served_from_the_front_dir() {
        let (status, body) = get("/static/index.html").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Order lookup"));
    }

    #[actix_web::test]
    async fn missing_static_asset_is_404() {
        let (status, _) = get("/static/nope.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn lookup_page_is_served_under_order() {
        let (status, body) = get("/order/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/order/"));
    }
}
