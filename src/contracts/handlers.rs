use std::path::Path as FsPath;

use actix_files::NamedFile;
use actix_web::{
    web::{self, Json, Path},
    Either, HttpResponse, Responder,
};
use chrono::Local;

use crate::contracts::models::{CreateAgentRequest, CreateContractRequest, GenerateResponse};
use crate::models::{Contract, RealEstateAgent};
use crate::pipeline::GenerateError;
use crate::{AppState, ErrorResponse};

#[utoipa::path(
    context_path = "/api",
    tag = "Contracts",
    post,
    path = "/agents",
    request_body = CreateAgentRequest,
    responses(
        (status = 201, description = "Agent created", body = RealEstateAgent),
        (status = 400, description = "License number already registered", body = ErrorResponse)
    )
)]
pub async fn create_agent(
    req: Json<CreateAgentRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    if data.db.license_exists(&req.license_number) {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "License number is already registered",
        ));
    }
    let agent = data.db.insert_agent(RealEstateAgent {
        id: 0,
        name: req.name,
        license_number: req.license_number,
        registration_date: req.registration_date,
        notes: req.notes,
    });
    HttpResponse::Created().json(agent)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contracts",
    get,
    path = "/agents/{id}",
    responses(
        (status = 200, description = "Agent found", body = RealEstateAgent),
        (status = 404, description = "Agent not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Agent id"))
)]
pub async fn get_agent(id: Path<i64>, data: web::Data<AppState>) -> impl Responder {
    match data.db.get_agent(id.into_inner()) {
        Some(agent) => HttpResponse::Ok().json(agent),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Agent not found")),
    }
}

/// Map a pipeline failure onto the HTTP error taxonomy: unresolved entities
/// are 404s, bad template input is a 400, everything else is a 500.
fn pipeline_error_response(err: &GenerateError) -> HttpResponse {
    if err.is_not_found() {
        return HttpResponse::NotFound().json(ErrorResponse::not_found(&err.to_string()));
    }
    match err {
        GenerateError::UnsupportedFormat(_)
        | GenerateError::MissingBinary(_)
        | GenerateError::Template(_) => {
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()))
        }
        _ => HttpResponse::InternalServerError()
            .json(ErrorResponse::internal_error(&err.to_string())),
    }
}

async fn run_generation(data: &web::Data<AppState>, contract_id: i64) -> Result<GenerateResponse, HttpResponse> {
    let db = data.db.clone();
    let pipeline = data.pipeline.clone();
    let outcome = web::block(move || pipeline.generate(&db, contract_id)).await;
    match outcome {
        Ok(Ok(files)) => Ok(GenerateResponse {
            contract_id,
            pdf_path: files.pdf_path.to_string_lossy().to_string(),
            original_file_path: files
                .original_file_path
                .map(|p| p.to_string_lossy().to_string()),
        }),
        Ok(Err(err)) => {
            log::error!("document generation failed for contract {contract_id}: {err}");
            Err(pipeline_error_response(&err))
        }
        Err(err) => {
            log::error!("generation task for contract {contract_id} did not complete: {err}");
            Err(HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Document generation failed")))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contracts",
    post,
    path = "/contracts",
    request_body = CreateContractRequest,
    responses(
        (status = 201, description = "Contract created; document generation is attempted immediately and its failure does not fail the request", body = Contract),
        (status = 400, description = "No template available", body = ErrorResponse),
        (status = 404, description = "Room or agent not found", body = ErrorResponse)
    )
)]
pub async fn create_contract(
    req: Json<CreateContractRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    if data.db.get_room(req.room_id).is_none() {
        return HttpResponse::NotFound().json(ErrorResponse::not_found("Room not found"));
    }
    if data.db.get_agent(req.agent_id).is_none() {
        return HttpResponse::NotFound().json(ErrorResponse::not_found("Agent not found"));
    }

    let template_id = match req.template_id {
        Some(id) => match data.db.get_template(id) {
            Some(template) => template.id,
            None => {
                return HttpResponse::NotFound()
                    .json(ErrorResponse::not_found("Template not found"));
            }
        },
        None => match data.db.default_template() {
            Some(template) => template.id,
            None => {
                return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
                    "No template specified and no default template is configured",
                ));
            }
        },
    };

    // Number assignment and insertion happen atomically in the store, so
    // concurrent creations on the same day cannot collide.
    let contract = data.db.create_contract(Local::now().date_naive(), Contract {
        id: 0,
        contract_number: String::new(),
        tenant_name: req.tenant_name,
        tenant_address: req.tenant_address,
        tenant_phone: req.tenant_phone,
        tenant_email: req.tenant_email,
        start_date: req.start_date,
        end_date: req.end_date,
        rent_amount: req.rent_amount,
        security_deposit: req.security_deposit,
        key_money: req.key_money,
        management_fee: req.management_fee,
        custom_special_terms: req.custom_special_terms,
        special_term_ids: req.special_term_ids,
        pdf_path: None,
        original_file_path: None,
        room_id: req.room_id,
        agent_id: req.agent_id,
        template_id,
    });

    // Generate eagerly so the PDF is ready on first download, but never fail
    // the creation over it; the document can be regenerated later.
    if let Err(response) = run_generation(&data, contract.id).await {
        log::warn!(
            "contract {} created but document generation failed ({})",
            contract.contract_number,
            response.status()
        );
    }

    match data.db.get_contract(contract.id) {
        Some(contract) => HttpResponse::Created().json(contract),
        None => HttpResponse::Created().json(contract),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contracts",
    get,
    path = "/contracts/{id}",
    responses(
        (status = 200, description = "Contract found", body = Contract),
        (status = 404, description = "Contract not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Contract id"))
)]
pub async fn get_contract(id: Path<i64>, data: web::Data<AppState>) -> impl Responder {
    match data.db.get_contract(id.into_inner()) {
        Some(contract) => HttpResponse::Ok().json(contract),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Contract not found")),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contracts",
    delete,
    path = "/contracts/{id}",
    responses(
        (status = 200, description = "Contract deleted", body = Contract),
        (status = 404, description = "Contract not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Contract id"))
)]
pub async fn delete_contract(id: Path<i64>, data: web::Data<AppState>) -> impl Responder {
    match data.db.delete_contract(id.into_inner()) {
        Some(contract) => {
            // File cleanup is best-effort; failures are logged, the entity
            // is gone either way.
            data.pipeline.remove_generated_files(&contract);
            HttpResponse::Ok().json(contract)
        }
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Contract not found")),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contracts",
    post,
    path = "/contracts/{id}/generate",
    responses(
        (status = 200, description = "Document generated", body = GenerateResponse),
        (status = 400, description = "Template content invalid", body = ErrorResponse),
        (status = 404, description = "Contract or related entity not found", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Contract id"))
)]
pub async fn generate_contract_document(
    id: Path<i64>,
    data: web::Data<AppState>,
) -> impl Responder {
    match run_generation(&data, id.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(response) => response,
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contracts",
    get,
    path = "/contracts/{id}/pdf",
    responses(
        (status = 200, description = "Contract PDF", content_type = "application/pdf"),
        (status = 404, description = "Contract not found", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Contract id"))
)]
pub async fn download_contract_pdf(
    id: Path<i64>,
    data: web::Data<AppState>,
) -> Either<NamedFile, HttpResponse> {
    let contract_id = id.into_inner();
    let contract = match data.db.get_contract(contract_id) {
        Some(contract) => contract,
        None => {
            return Either::Right(
                HttpResponse::NotFound().json(ErrorResponse::not_found("Contract not found")),
            );
        }
    };

    // Regenerate when the recorded file went missing (fresh deploy, cleaned
    // temp directory) or was never produced.
    let needs_generation = contract
        .pdf_path
        .as_deref()
        .map(|p| !FsPath::new(p).is_file())
        .unwrap_or(true);
    let contract = if needs_generation {
        if let Err(response) = run_generation(&data, contract_id).await {
            return Either::Right(response);
        }
        match data.db.get_contract(contract_id) {
            Some(contract) => contract,
            None => {
                return Either::Right(
                    HttpResponse::NotFound().json(ErrorResponse::not_found("Contract not found")),
                );
            }
        }
    } else {
        contract
    };

    let Some(pdf_path) = contract.pdf_path else {
        return Either::Right(
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Contract PDF is unavailable")),
        );
    };
    match NamedFile::open(&pdf_path) {
        Ok(file) => Either::Left(file),
        Err(err) => {
            log::error!("failed to open generated PDF {pdf_path}: {err}");
            Either::Right(
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::internal_error("Contract PDF is unavailable")),
            )
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contracts",
    get,
    path = "/contracts/{id}/original",
    responses(
        (status = 200, description = "Original-format document; MIME type follows the file extension"),
        (status = 404, description = "Contract or original file not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Contract id"))
)]
pub async fn download_contract_original(
    id: Path<i64>,
    data: web::Data<AppState>,
) -> Either<NamedFile, HttpResponse> {
    let contract = match data.db.get_contract(id.into_inner()) {
        Some(contract) => contract,
        None => {
            return Either::Right(
                HttpResponse::NotFound().json(ErrorResponse::not_found("Contract not found")),
            );
        }
    };
    let Some(original_path) = contract.original_file_path else {
        return Either::Right(HttpResponse::NotFound().json(ErrorResponse::not_found(
            "Contract has no original-format document",
        )));
    };
    match NamedFile::open(&original_path) {
        Ok(file) => Either::Left(file),
        Err(err) => {
            log::error!("failed to open original document {original_path}: {err}");
            Either::Right(HttpResponse::NotFound().json(ErrorResponse::not_found(
                "Original document file is missing",
            )))
        }
    }
}
