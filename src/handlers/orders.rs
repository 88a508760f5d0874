use std::path::PathBuf;

use actix_web::{web, HttpResponse};

use crate::application::order_service::OrderService;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;
use crate::errors::AppError;

/// Directory holding the lookup page.
#[derive(Debug, Clone)]
pub struct FrontDir(pub PathBuf);

/// GET /order/{order_uid}
///
/// Answers from the cache when possible, otherwise from the store, in which
/// case the order is cached for the next lookup.
#[utoipa::path(
    get,
    path = "/order/{order_uid}",
    params(
        ("order_uid" = String, Path, description = "Order identifier"),
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found"),
        (status = 503, description = "Order not cached and the store is unreachable"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order<R: OrderRepository>(
    service: web::Data<OrderService<R>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_uid = path.into_inner();

    let order = web::block(move || service.get_order(&order_uid))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(order.as_ref()))
}

/// GET /order/
///
/// Serves the static lookup page.
pub async fn index(front: web::Data<FrontDir>) -> Result<HttpResponse, AppError> {
    let page = front.0.join("index.html");
    let html = tokio::fs::read_to_string(&page).await.map_err(|e| {
        log::error!("Failed to read {}: {}", page.display(), e);
        AppError::Internal(e.to_string())
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};

    use super::*;
    use crate::cache::OrderCache;
    use crate::domain::validation::tests::valid_order;
    use crate::infrastructure::memory::InMemoryOrderRepository;

    type Repo = InMemoryOrderRepository;

    fn service(repo: Arc<Repo>) -> OrderService<Repo> {
        let cache = Arc::new(OrderCache::new(NonZeroUsize::new(4).expect("non-zero")));
        OrderService::new(repo, cache)
    }

    #[actix_web::test]
    async fn get_order_returns_json_aggregate() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let order = valid_order("abc123");
        repo.persist(&order).expect("persist");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service(repo)))
                .route("/order/{order_uid}", web::get().to(get_order::<Repo>)),
        )
        .await;

        let req = test::TestRequest::get().uri("/order/abc123").to_request();
        let body: Order = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, order);
    }

    #[actix_web::test]
    async fn unknown_order_returns_404() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service(repo)))
                .route("/order/{order_uid}", web::get().to(get_order::<Repo>)),
        )
        .await;

        let req = test::TestRequest::get().uri("/order/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn store_outage_on_miss_returns_503() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        repo.set_offline(true);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service(repo)))
                .route("/order/{order_uid}", web::get().to(get_order::<Repo>)),
        )
        .await;

        let req = test::TestRequest::get().uri("/order/any").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn missing_front_dir_is_a_server_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FrontDir(PathBuf::from("/nonexistent/front"))))
                .route("/order/", web::get().to(index)),
        )
        .await;

        let req = test::TestRequest::get().uri("/order/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
