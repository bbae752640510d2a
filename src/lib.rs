use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod contracts;
pub mod db;
pub mod file_store;
pub mod models;
pub mod pipeline;
pub mod properties;
pub mod templates;

use crate::db::Database;
use crate::file_store::FileStore;
use crate::pipeline::{DocumentPipeline, WeasyPrintEngine};

/// Shared application state: the entity store plus the document pipeline.
/// Cloning is cheap; both members share their backing data.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub pipeline: DocumentPipeline,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

pub async fn run() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::properties::handlers::create_owner,
            crate::properties::handlers::get_owner,
            crate::properties::handlers::create_building,
            crate::properties::handlers::get_building,
            crate::properties::handlers::create_room,
            crate::properties::handlers::get_room,
            crate::contracts::handlers::create_agent,
            crate::contracts::handlers::get_agent,
            crate::templates::handlers::upload_template,
            crate::templates::handlers::get_template,
            crate::templates::handlers::set_default_template,
            crate::templates::handlers::download_template,
            crate::templates::handlers::create_special_term,
            crate::templates::handlers::get_special_term,
            crate::contracts::handlers::create_contract,
            crate::contracts::handlers::get_contract,
            crate::contracts::handlers::delete_contract,
            crate::contracts::handlers::generate_contract_document,
            crate::contracts::handlers::download_contract_pdf,
            crate::contracts::handlers::download_contract_original
        ),
        components(
            schemas(
                models::Owner,
                models::Building,
                models::Room,
                models::RealEstateAgent,
                models::SpecialTerm,
                models::ContractTemplate,
                models::Contract,
                properties::models::CreateOwnerRequest,
                properties::models::CreateBuildingRequest,
                properties::models::CreateRoomRequest,
                templates::models::UploadTemplateRequest,
                templates::models::CreateSpecialTermRequest,
                contracts::models::CreateAgentRequest,
                contracts::models::CreateContractRequest,
                contracts::models::GenerateResponse,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Property Master Data", description = "Owner, building and room records."),
            (name = "Contract Templates", description = "Template uploads and reusable special terms."),
            (name = "Contracts", description = "Lease contracts and document generation.")
        ),
        servers(
            (url = "http://127.0.0.1:8080", description = "Localhost server")
        )
    )]
    struct ApiDoc;

    dotenvy::dotenv().ok(); // Load .env file

    let store = FileStore::from_env();
    if let Err(e) = store.ensure_layout() {
        log::error!(
            "Failed to prepare the contract file store at {}: {e}",
            store.root().display()
        );
        std::process::exit(1);
    }
    log::info!("Contract files stored under {}", store.root().display());

    let app_state = web::Data::new(AppState {
        db: Database::new(),
        pipeline: DocumentPipeline::new(store, Arc::new(WeasyPrintEngine)),
    });

    log::info!("Starting server at http://0.0.0.0:8080");

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(cors)
            .app_data(app_state)
            .service(
                web::scope("/api")
                    .service(
                        web::resource("/owners")
                            .route(web::post().to(properties::handlers::create_owner)),
                    )
                    .service(
                        web::resource("/owners/{id}")
                            .route(web::get().to(properties::handlers::get_owner)),
                    )
                    .service(
                        web::resource("/buildings")
                            .route(web::post().to(properties::handlers::create_building)),
                    )
                    .service(
                        web::resource("/buildings/{id}")
                            .route(web::get().to(properties::handlers::get_building)),
                    )
                    .service(
                        web::resource("/rooms")
                            .route(web::post().to(properties::handlers::create_room)),
                    )
                    .service(
                        web::resource("/rooms/{id}")
                            .route(web::get().to(properties::handlers::get_room)),
                    )
                    .service(
                        web::resource("/agents")
                            .route(web::post().to(contracts::handlers::create_agent)),
                    )
                    .service(
                        web::resource("/agents/{id}")
                            .route(web::get().to(contracts::handlers::get_agent)),
                    )
                    .service(
                        web::resource("/templates")
                            .route(web::post().to(templates::handlers::upload_template)),
                    )
                    .service(
                        web::resource("/templates/{id}")
                            .route(web::get().to(templates::handlers::get_template)),
                    )
                    .service(
                        web::resource("/templates/{id}/default")
                            .route(web::put().to(templates::handlers::set_default_template)),
                    )
                    .service(
                        web::resource("/templates/{id}/download")
                            .route(web::get().to(templates::handlers::download_template)),
                    )
                    .service(
                        web::resource("/special-terms")
                            .route(web::post().to(templates::handlers::create_special_term)),
                    )
                    .service(
                        web::resource("/special-terms/{id}")
                            .route(web::get().to(templates::handlers::get_special_term)),
                    )
                    .service(
                        web::resource("/contracts")
                            .route(web::post().to(contracts::handlers::create_contract)),
                    )
                    .service(
                        web::resource("/contracts/{id}")
                            .route(web::get().to(contracts::handlers::get_contract))
                            .route(web::delete().to(contracts::handlers::delete_contract)),
                    )
                    .service(
                        web::resource("/contracts/{id}/generate")
                            .route(web::post().to(contracts::handlers::generate_contract_document)),
                    )
                    .service(
                        web::resource("/contracts/{id}/pdf")
                            .route(web::get().to(contracts::handlers::download_contract_pdf)),
                    )
                    .service(
                        web::resource("/contracts/{id}/original")
                            .route(web::get().to(contracts::handlers::download_contract_original)),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .backlog(8192)
    .max_connections(25000)
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
