mod auth;
mod clock;
mod db;
mod employees;
mod error;
mod menus;
mod notify;
mod reports;
mod reservations;
mod tokens;
mod validation;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use employees::repository::EmployeeRepository;
use menus::repository::MenuRepository;
use notify::{LoggingDispatcher, NotificationDispatcher};
use reports::service::ReportService;
use reservations::repository::{
    AdvanceOrderRepository, CombinedOrderRepository, OrderRepository,
};
use reservations::service::{AdvanceOrderService, ReservationService};
use tokens::{AccessTokenRepository, AccessTokenService};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        menus::handlers::list_menus_handler,
        menus::handlers::weekly_menu_handler,
        menus::handlers::find_menus_handler,
        menus::handlers::get_menu_handler,
        menus::handlers::create_menu_handler,
        menus::handlers::batch_create_menus_handler,
        menus::handlers::update_menu_handler,
        menus::handlers::delete_menu_handler,
    ),
    components(schemas(
        menus::models::Menu,
        menus::models::MenuType,
        menus::models::CreateMenuRequest,
        menus::models::UpdateMenuRequest,
        employees::models::Employee,
        employees::models::CustomerType,
        reservations::models::Order,
        reservations::models::AdvanceOrder,
        reservations::models::CombinedOrder,
        reservations::models::ReservationStatus,
        reservations::models::Source,
        reservations::models::PlaceOrderRequest,
        reservations::models::UpdateReservationRequest,
        reservations::models::AdvanceSelection,
        reservations::models::AdvanceBatchRequest,
        reservations::models::BatchSubmitResponse,
        reservations::models::BulkCompleteResponse,
        reports::models::ExpatMonthlyDeduction,
        reports::models::DailySummaryEntry,
    )),
    tags(
        (name = "meal-reservation-api", description = "Workplace meal ordering and reservation API")
    )
)]
struct ApiDoc;

/// Shared application state cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub employee_repo: EmployeeRepository,
    pub menu_repo: MenuRepository,
    pub combined_repo: CombinedOrderRepository,
    pub reservation_service: ReservationService,
    pub advance_order_service: AdvanceOrderService,
    pub report_service: ReportService,
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(db: PgPool, dispatcher: Arc<dyn NotificationDispatcher>, base_url: String) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let employee_repo = EmployeeRepository::new(db.clone());
    let menu_repo = MenuRepository::new(db.clone());
    let order_repo = OrderRepository::new(db.clone());
    let advance_repo = AdvanceOrderRepository::new(db.clone());
    let combined_repo = CombinedOrderRepository::new(db.clone());
    let token_service = AccessTokenService::new(AccessTokenRepository::new(db.clone()));

    let reservation_service = ReservationService::new(
        order_repo,
        advance_repo.clone(),
        combined_repo.clone(),
        menu_repo.clone(),
        employee_repo.clone(),
        token_service,
        dispatcher,
        base_url,
    );
    let advance_order_service =
        AdvanceOrderService::new(advance_repo, menu_repo.clone(), employee_repo.clone());
    let report_service = ReportService::new(combined_repo.clone());

    let state = AppState {
        db,
        employee_repo,
        menu_repo,
        combined_repo,
        reservation_service,
        advance_order_service,
        report_service,
    };

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Catalog maintenance, bulk completion, and reporting require the
    // Admin role; everything else authenticates per-handler.
    let admin_routes = Router::new()
        .route("/api/menus", post(menus::handlers::create_menu_handler))
        .route(
            "/api/menus/batch",
            post(menus::handlers::batch_create_menus_handler),
        )
        .route("/api/menus/:id", put(menus::handlers::update_menu_handler))
        .route("/api/menus/:id", delete(menus::handlers::delete_menu_handler))
        .route(
            "/api/orders/complete/:menu_type",
            post(reservations::handlers::bulk_complete_handler),
        )
        .route(
            "/api/reports/deductions/monthly",
            get(reports::handlers::monthly_deductions_handler),
        )
        .route(
            "/api/reports/summary/daily",
            get(reports::handlers::daily_summary_handler),
        )
        .route(
            "/api/reports/csv/:customer_type",
            get(reports::handlers::orders_csv_handler),
        )
        .route(
            "/api/reports/fulfillment/:menu_type",
            get(reports::handlers::fulfillment_feed_handler),
        )
        .route_layer(axum::middleware::from_fn(
            |req: axum::extract::Request, next: axum::middleware::Next| {
                auth::RequireRole::admin().middleware(req, next)
            },
        ));

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Menu catalog
        .route("/api/menus", get(menus::handlers::list_menus_handler))
        .route("/api/menus/weekly", get(menus::handlers::weekly_menu_handler))
        .route(
            "/api/menus/find/:menu_type/:date",
            get(menus::handlers::find_menus_handler),
        )
        .route("/api/menus/:id", get(menus::handlers::get_menu_handler))
        // Reservation lifecycle
        .route("/api/orders", post(reservations::handlers::place_order_handler))
        .route(
            "/api/orders/summary",
            get(reservations::handlers::order_summary_handler),
        )
        .route(
            "/api/orders/today/:menu_type",
            get(reservations::handlers::today_orders_handler),
        )
        .route(
            "/api/orders/:reference",
            put(reservations::handlers::update_reservation_handler),
        )
        .route(
            "/api/orders/:reference/cancel",
            post(reservations::handlers::cancel_reservation_handler),
        )
        // Advance-order batch submission
        .route(
            "/api/advance-orders/lunch",
            post(reservations::handlers::submit_lunch_batch_handler),
        )
        .route(
            "/api/advance-orders/breakfast",
            post(reservations::handlers::submit_breakfast_batch_handler),
        )
        // Employee directory
        .route(
            "/api/employees/meal-eligible",
            get(employees::handlers::list_meal_eligible_handler),
        )
        .route(
            "/api/employees/:employee_id",
            get(employees::handlers::get_employee_handler),
        )
        .merge(admin_routes)
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Meal Reservation API - Starting...");

    // Get configuration from environment variables
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let base_url =
        std::env::var("BASE_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Create the application router
    let app = create_router(db_pool, Arc::new(LoggingDispatcher), base_url);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Meal Reservation API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
