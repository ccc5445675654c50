use utoipa::OpenApi;

use crate::routes::api;

#[derive(OpenApi)]
#[openapi(info(
    title = "parley-server",
    description = "parley-server API",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(api::api_docs());
    root.merge(super::health::HealthApi::openapi());
    root
}
