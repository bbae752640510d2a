use actix_multipart::Multipart;
use actix_web::{
    web::{self, Json, Path},
    HttpResponse, Responder,
};
use futures::TryStreamExt;
use sanitize_filename::sanitize;

use crate::models::{ContractTemplate, SpecialTerm, TemplateFormat};
use crate::templates::models::CreateSpecialTermRequest;
use crate::{AppState, ErrorResponse};

#[derive(Default)]
struct TemplateUpload {
    name: Option<String>,
    description: Option<String>,
    file_type: Option<String>,
    is_default: bool,
    file: Option<(String, Vec<u8>)>,
}

async fn read_field_bytes(field: &mut actix_multipart::Field) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|e| e.to_string())? {
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_field_text(field: &mut actix_multipart::Field) -> Result<String, String> {
    let bytes = read_field_bytes(field).await?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

async fn read_upload(mut payload: Multipart) -> Result<TemplateUpload, String> {
    let mut upload = TemplateUpload::default();

    while let Some(mut field) = payload.try_next().await.map_err(|e| e.to_string())? {
        let (field_name, filename) = {
            let content_disposition = field
                .content_disposition()
                .ok_or("Content-Disposition not set")?;
            (
                content_disposition.get_name().map(str::to_string),
                content_disposition.get_filename().map(str::to_string),
            )
        };
        let field_name = field_name.ok_or_else(|| "No field name".to_string())?;

        match field_name.as_str() {
            "file" => {
                let filename = filename.ok_or_else(|| "No filename".to_string())?;
                let bytes = read_field_bytes(&mut field).await?;
                upload.file = Some((sanitize(&filename), bytes));
            }
            "name" => upload.name = Some(read_field_text(&mut field).await?),
            "description" => upload.description = Some(read_field_text(&mut field).await?),
            "file_type" => upload.file_type = Some(read_field_text(&mut field).await?),
            "is_default" => {
                let value = read_field_text(&mut field).await?;
                upload.is_default = matches!(value.trim(), "true" | "1");
            }
            _ => continue,
        }
    }

    Ok(upload)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Templates",
    post,
    path = "/templates",
    request_body(content = crate::templates::models::UploadTemplateRequest, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Template stored", body = ContractTemplate),
        (status = 400, description = "Invalid upload", body = ErrorResponse)
    )
)]
pub async fn upload_template(payload: Multipart, data: web::Data<AppState>) -> impl Responder {
    let upload = match read_upload(payload).await {
        Ok(upload) => upload,
        Err(msg) => {
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&msg));
        }
    };

    let name = match upload.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::bad_request("Template name is required"));
        }
    };
    let file_type = upload.file_type.unwrap_or_else(|| "html".to_string());
    if file_type.parse::<TemplateFormat>().is_err() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!(
            "Unsupported template format: {file_type}"
        )));
    }
    let (file_name, bytes) = match upload.file {
        Some(file) => file,
        None => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::bad_request("No template file was uploaded"));
        }
    };

    // HTML templates are stored as text; the Office/PDF formats keep the
    // uploaded bytes verbatim.
    let (file_content, file_binary) = if file_type == "html" {
        match String::from_utf8(bytes) {
            Ok(text) => (text, None),
            Err(_) => {
                return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
                    "HTML template file must be valid UTF-8",
                ));
            }
        }
    } else {
        (String::new(), Some(bytes))
    };

    let template = data.db.insert_template(ContractTemplate {
        id: 0,
        name,
        description: upload.description,
        file_content,
        file_type,
        file_binary,
        file_name: Some(file_name),
        is_default: upload.is_default,
    });
    HttpResponse::Created().json(template)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Templates",
    get,
    path = "/templates/{id}",
    responses(
        (status = 200, description = "Template found", body = ContractTemplate),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Template id"))
)]
pub async fn get_template(id: Path<i64>, data: web::Data<AppState>) -> impl Responder {
    match data.db.get_template(id.into_inner()) {
        Some(template) => HttpResponse::Ok().json(template),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Template not found")),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Templates",
    put,
    path = "/templates/{id}/default",
    responses(
        (status = 200, description = "Template marked as default", body = ContractTemplate),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Template id"))
)]
pub async fn set_default_template(id: Path<i64>, data: web::Data<AppState>) -> impl Responder {
    let template_id = id.into_inner();
    if !data.db.set_default_template(template_id) {
        return HttpResponse::NotFound().json(ErrorResponse::not_found("Template not found"));
    }
    match data.db.get_template(template_id) {
        Some(template) => HttpResponse::Ok().json(template),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Template not found")),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Templates",
    get,
    path = "/templates/{id}/download",
    responses(
        (status = 200, description = "Template file"),
        (status = 404, description = "Template or file not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Template id"))
)]
pub async fn download_template(id: Path<i64>, data: web::Data<AppState>) -> impl Responder {
    let template = match data.db.get_template(id.into_inner()) {
        Some(template) => template,
        None => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Template not found"));
        }
    };

    if template.file_type == "html" {
        return HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(template.file_content);
    }

    match template.file_binary {
        Some(bytes) => {
            let mime = template
                .file_name
                .as_deref()
                .map(|name| mime_guess::from_path(name).first_or_octet_stream())
                .unwrap_or(mime_guess::mime::APPLICATION_OCTET_STREAM);
            HttpResponse::Ok().content_type(mime.as_ref()).body(bytes)
        }
        None => HttpResponse::NotFound()
            .json(ErrorResponse::not_found("Template has no binary data")),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Templates",
    post,
    path = "/special-terms",
    request_body = CreateSpecialTermRequest,
    responses(
        (status = 201, description = "Special term created", body = SpecialTerm)
    )
)]
pub async fn create_special_term(
    req: Json<CreateSpecialTermRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    let term = data.db.insert_special_term(SpecialTerm {
        id: 0,
        title: req.title,
        content: req.content,
        is_common: req.is_common,
    });
    HttpResponse::Created().json(term)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Templates",
    get,
    path = "/special-terms/{id}",
    responses(
        (status = 200, description = "Special term found", body = SpecialTerm),
        (status = 404, description = "Special term not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Special term id"))
)]
pub async fn get_special_term(id: Path<i64>, data: web::Data<AppState>) -> impl Responder {
    match data.db.get_special_term(id.into_inner()) {
        Some(term) => HttpResponse::Ok().json(term),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Special term not found")),
    }
}
