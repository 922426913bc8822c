use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    api_errors::ApiError,
    constants::MAX_CONTACT_BODY_BYTES,
    entities::submission::{ContactForm, ContactResponse},
    limiter::rate_limiter::RateDecision,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// `POST /contact`
///
/// The rate check runs on the raw request before the body is read, so a
/// throttled client never reaches validation or the log. Bodies over
/// `MAX_CONTACT_BODY_BYTES` are refused after the check and still use a slot.
#[tracing::instrument(name = "Contact submission", skip_all, fields(client = tracing::field::Empty))]
pub async fn create_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let client = get_client_ip(&req, state.trust_x_forwarded_for);
    tracing::Span::current().record("client", client.as_str());

    if let RateDecision::Rejected { retry_after } = state.rate_limiter.check_and_record(&client) {
        tracing::warn!(retry_after_secs = retry_after.as_secs(), "Rate limit exceeded");
        return Err(ApiError::RateLimited { retry_after });
    }

    let body = match payload.to_bytes_limited(MAX_CONTACT_BODY_BYTES).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            tracing::warn!("Failed to read request body: {}", e);
            return Err(ApiError::MalformedBody);
        }
        Err(_) => return Err(ApiError::PayloadTooLarge),
    };

    let form = parse_contact_form(&body)?;

    // the notification task is detached; the response never waits for it
    let _accepted = state.contact_handler.submit(form).await?;

    Ok(HttpResponse::Ok().json(ContactResponse::ok()))
}

fn parse_contact_form(body: &[u8]) -> Result<ContactForm, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(ApiError::MalformedBody);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_body() {
        let form = parse_contact_form(br#"{"name":"A","email":"a@b.com","subject":"S","message":"M"}"#)
            .unwrap();

        assert_eq!(form.name.as_deref(), Some("A"));
        assert_eq!(form.message.as_deref(), Some("M"));
    }

    #[test]
    fn missing_fields_parse_but_stay_empty() {
        let form = parse_contact_form(br#"{"name":"A"}"#).unwrap();

        assert!(form.email.is_none());
    }

    #[test]
    fn rejects_malformed_bodies() {
        for body in [&b"not json"[..], b"", b"[]", b"\"text\"", br#"{"name":5}"#] {
            assert!(
                matches!(parse_contact_form(body), Err(ApiError::MalformedBody)),
                "accepted {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }
}
