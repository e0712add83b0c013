//! Attachment responses for generated documents.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::HttpResponse;

use crate::docx::DOCX_MIME;

use super::GeneratedDocument;

/// `Content-Disposition: attachment; filename="..."`.
pub fn attachment_disposition(filename: &str) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(filename.to_string())],
    }
}

/// Wrap a generated `.docx` in a `200 OK` download response.
pub fn docx_attachment(document: GeneratedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(DOCX_MIME)
        .insert_header(attachment_disposition(document.filename))
        .body(document.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::header;

    #[actix_web::test]
    async fn test_docx_attachment_headers() {
        let response = docx_attachment(GeneratedDocument {
            filename: "LISTA_ENSAIO_LOCAL_EDITADO.docx",
            bytes: b"PK\x03\x04".to_vec(),
        });

        let headers = response.headers();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), DOCX_MIME);
        assert_eq!(
            headers.get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"LISTA_ENSAIO_LOCAL_EDITADO.docx\""
        );

        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], b"PK\x03\x04");
    }
}
