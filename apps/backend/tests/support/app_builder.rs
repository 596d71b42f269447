use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, App, Error};
use food_backend::middleware::{RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan};
use food_backend::routes;
use food_backend::state::app_state::AppState;

/// Full route table behind the production middleware stack, minus rate
/// limiting and CORS.
pub async fn create_test_app(
    data: actix_web::web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(SecurityHeaders)
            .app_data(data)
            .configure(routes::configure),
    )
    .await
}
