/// 공개 문의 폼 및 경매 출품 요청 폼
// region:    --- Imports
use crate::error::{AppError, AppResult};
use crate::mailer::templates::FormSender;
use crate::mailer::{self, EmailAttachment, OutgoingEmail};
use crate::state::AppState;
use axum::extract::Multipart;
use serde::Deserialize;
use tracing::{error, info};
use validator::Validate;
// endregion: --- Imports

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[validate(length(min = 4, max = 50))]
    pub first_name: String,
    #[validate(length(min = 4, max = 50))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 4000))]
    pub text: String,
}

/// 출품 요청 (multipart: 텍스트 필드 + 작품/인증서 이미지)
#[derive(Debug, Default, Validate)]
pub struct AuctionRequestForm {
    #[validate(length(min = 4, max = 50))]
    pub first_name: String,
    #[validate(length(min = 4, max = 50))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 4000))]
    pub message: String,
    pub art: Option<EmailAttachment>,
    pub cert: Option<EmailAttachment>,
}

impl AuctionRequestForm {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "firstName" => form.first_name = field.text().await.map_err(malformed)?,
                "lastName" => form.last_name = field.text().await.map_err(malformed)?,
                "email" => form.email = field.text().await.map_err(malformed)?,
                "message" => form.message = field.text().await.map_err(malformed)?,
                "art" | "cert" => {
                    let filename = field.file_name().unwrap_or(name.as_str()).to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let data = field.bytes().await.map_err(malformed)?.to_vec();
                    let attachment = EmailAttachment {
                        filename,
                        content_type,
                        data,
                    };
                    if name == "art" {
                        form.art = Some(attachment);
                    } else {
                        form.cert = Some(attachment);
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    /// 필드 검증 후 두 첨부 이미지 반환
    pub fn into_attachments(self) -> AppResult<(Self, EmailAttachment, EmailAttachment)> {
        self.validate()?;
        let mut form = self;
        let art = take_image(form.art.take(), "art")?;
        let cert = take_image(form.cert.take(), "cert")?;
        Ok((form, art, cert))
    }
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::bad_request(format!("잘못된 multipart 요청: {}", e), "INVALID_FORM")
}

fn take_image(file: Option<EmailAttachment>, field: &str) -> AppResult<EmailAttachment> {
    let file = file
        .filter(|f| !f.data.is_empty())
        .ok_or_else(|| AppError::bad_request(format!("{} 파일이 필요합니다.", field), "FILE_REQUIRED"))?;
    if !file.content_type.starts_with("image/") {
        return Err(AppError::bad_request(
            format!("{} 파일은 이미지여야 합니다.", field),
            "INVALID_FILE",
        ));
    }
    Ok(file)
}

/// 문의 내용을 관리자 메일함으로 발송
pub async fn send_contact_message(state: &AppState, form: ContactForm) -> AppResult<()> {
    form.validate()?;
    let sender = FormSender {
        first_name: &form.first_name,
        last_name: &form.last_name,
        email: &form.email,
    };
    let rendered = state.templates.contact_message(&sender, &form.text).map_err(|e| {
        error!("{:<12} --> 문의 메일 본문 생성 실패: {}", "Mailer", e);
        AppError::internal("메일 본문 생성 실패")
    })?;

    let email = OutgoingEmail::new(&state.config.email.staff_inbox, rendered.subject, rendered.text)
        .with_html(rendered.html);
    mailer::dispatch(state.mailer.as_ref(), email).await;
    info!("{:<12} --> 문의 접수: {}", "Handler", form.email);
    Ok(())
}

/// 출품 요청을 첨부 파일과 함께 관리자 메일함으로 발송
pub async fn send_auction_request(state: &AppState, form: AuctionRequestForm) -> AppResult<()> {
    let (form, art, cert) = form.into_attachments()?;
    let sender = FormSender {
        first_name: &form.first_name,
        last_name: &form.last_name,
        email: &form.email,
    };
    let rendered = state.templates.auction_request(&sender, &form.message).map_err(|e| {
        error!("{:<12} --> 출품 요청 메일 본문 생성 실패: {}", "Mailer", e);
        AppError::internal("메일 본문 생성 실패")
    })?;

    let email = OutgoingEmail::new(&state.config.email.staff_inbox, rendered.subject, rendered.text)
        .with_html(rendered.html)
        .with_attachment(cert)
        .with_attachment(art);
    mailer::dispatch(state.mailer.as_ref(), email).await;
    info!("{:<12} --> 출품 요청 접수: {}", "Handler", form.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> EmailAttachment {
        EmailAttachment {
            filename: name.into(),
            content_type: "image/jpeg".into(),
            data: vec![0xff, 0xd8, 0xff],
        }
    }

    fn request() -> AuctionRequestForm {
        AuctionRequestForm {
            first_name: "Anna".into(),
            last_name: "Nowak".into(),
            email: "anna@example.com".into(),
            message: "Oil on canvas, 1970".into(),
            art: Some(image("art.jpg")),
            cert: Some(image("cert.jpg")),
        }
    }

    #[test]
    fn contact_form_uses_camel_case_fields() {
        let form: ContactForm = serde_json::from_str(
            r#"{"firstName": "Anna", "lastName": "Nowak", "email": "anna@example.com", "text": "Hi there"}"#,
        )
        .unwrap();
        assert!(form.validate().is_ok());
        assert_eq!(form.first_name, "Anna");
    }

    #[test]
    fn contact_form_rejects_short_names() {
        let form = ContactForm {
            first_name: "Al".into(),
            last_name: "Nowak".into(),
            email: "anna@example.com".into(),
            text: "Hi".into(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn auction_request_requires_both_files() {
        let (_, art, cert) = request().into_attachments().unwrap();
        assert_eq!(art.filename, "art.jpg");
        assert_eq!(cert.filename, "cert.jpg");

        let mut missing = request();
        missing.cert = None;
        assert_eq!(missing.into_attachments().unwrap_err().code(), "FILE_REQUIRED");
    }

    #[test]
    fn auction_request_rejects_non_images() {
        let mut form = request();
        if let Some(art) = form.art.as_mut() {
            art.content_type = "application/pdf".into();
        }
        assert_eq!(form.into_attachments().unwrap_err().code(), "INVALID_FILE");
    }
}
