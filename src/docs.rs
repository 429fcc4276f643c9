use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::export::handler::process_async,
        crate::modules::export::handler::process_sync,
    ),
    tags(
        (name = "Export", description = "Timelapse export from stored image sequences")
    )
)]
pub struct ApiDoc;
