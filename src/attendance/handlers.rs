use actix_files::NamedFile;
use actix_web::{web, HttpResponse, Responder};
use log::{error, info};

use crate::{AppState, ErrorResponse};

use super::assembler::AttendanceListGenerator;
use super::comparecimento::ComparecimentoGenerator;
use super::download::docx_attachment;
use super::models::{AttendanceRequest, ComparecimentoRequest};
use super::traits::Generator;
use super::{GeneratedDocument, GenerationError};

/// Serves the attendance form.
pub async fn index(state: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(state.config.index_page()).await?)
}

#[utoipa::path(
    post,
    path = "/save",
    tag = "Ensaio Local",
    request_body = AttendanceRequest,
    responses(
        (status = 200, description = "LISTA_ENSAIO_LOCAL_EDITADO.docx attachment"),
        (status = 400, description = "Body is not valid JSON", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn save_attendance(
    state: web::Data<AppState>,
    body: web::Json<AttendanceRequest>,
) -> impl Responder {
    let request = body.into_inner();
    info!(
        "Executing save_attendance handler ({} musicians, {} organists)",
        request.musicians.as_ref().map_or(0, Vec::len),
        request.organists.as_ref().map_or(0, Vec::len)
    );

    let layout = state.config.layout.clone();
    let result = web::block(move || AttendanceListGenerator::new(layout).generate(request)).await;

    respond(result.map_err(|e| GenerationError::Blocking(e.to_string())).and_then(|r| r))
}

#[utoipa::path(
    post,
    path = "/save_comparecimento",
    tag = "Ensaio Local",
    request_body = ComparecimentoRequest,
    responses(
        (status = 200, description = "COMPARCIMENTO_ENSAIO_LOCAL.docx attachment"),
        (status = 400, description = "Body is not valid JSON", body = ErrorResponse),
        (status = 500, description = "Template missing or unreadable", body = ErrorResponse)
    )
)]
pub async fn save_comparecimento(
    state: web::Data<AppState>,
    body: web::Json<ComparecimentoRequest>,
) -> impl Responder {
    let request = body.into_inner();
    info!(
        "Executing save_comparecimento handler for date {:?}",
        request.date_text
    );

    let config = state.config.clone();
    let result = web::block(move || {
        ComparecimentoGenerator::load(
            &config.comparecimento_template,
            config.comparecimento.clone(),
        )?
        .generate(request)
    })
    .await;

    respond(result.map_err(|e| GenerationError::Blocking(e.to_string())).and_then(|r| r))
}

fn respond(result: Result<GeneratedDocument, GenerationError>) -> HttpResponse {
    match result {
        Ok(document) => {
            info!(
                "Generated {} ({} bytes)",
                document.filename,
                document.bytes.len()
            );
            docx_attachment(document)
        }
        Err(e) => {
            error!("Document generation failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/save").route(web::post().to(save_attendance)))
        .service(
            web::resource("/save_comparecimento").route(web::post().to(save_comparecimento)),
        );
}
