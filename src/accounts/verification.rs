/// 이메일/전화 인증 및 재설정 토큰 유효성 규칙
// region:    --- Imports
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use validator::ValidationError;
// endregion: --- Imports

lazy_static! {
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?1?\d{9,15}$").expect("valid phone regex");
}

/// 만료 시각이 없거나 지났으면 만료
pub fn is_expired(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expiry {
        Some(expiry) => expiry <= now,
        None => true,
    }
}

/// 6자리 전화 인증 코드
pub fn generate_phone_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..=999_999))
}

#[derive(Debug, PartialEq, Eq)]
pub enum PhoneCodeCheck {
    Verified,
    Missing,
    Expired,
    Mismatch,
}

/// 전화 인증 코드 확인 (누락, 만료, 불일치 순)
pub fn check_phone_code(
    submitted: Option<&str>,
    stored: Option<&str>,
    expiry: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> PhoneCodeCheck {
    let submitted = match submitted.map(str::trim) {
        Some(code) if !code.is_empty() => code,
        _ => return PhoneCodeCheck::Missing,
    };
    if is_expired(expiry, now) {
        return PhoneCodeCheck::Expired;
    }
    match stored {
        Some(stored) if !stored.is_empty() && stored == submitted => PhoneCodeCheck::Verified,
        _ => PhoneCodeCheck::Mismatch,
    }
}

/// 국가 코드(`+`)로 시작하는 9~15자리 번호
pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    if !value.starts_with('+') {
        let mut err = ValidationError::new("phone_prefix");
        err.message = Some("전화번호는 '+' 로 시작해야 합니다.".into());
        return Err(err);
    }
    if !PHONE_REGEX.is_match(value) {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("전화번호 형식이 올바르지 않습니다.".into());
        return Err(err);
    }
    Ok(())
}

/// 도메인 부분만 소문자로 정규화
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Google 계정 사용자명 (`{이름}_{성}`)
pub fn google_username(name: Option<&str>, family_name: Option<&str>) -> String {
    format!("{}_{}", name.unwrap_or("user"), family_name.unwrap_or("google"))
        .replace(char::is_whitespace, "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn token_past_expiry_is_rejected() {
        let now = now();
        assert!(is_expired(Some(now - Duration::seconds(1)), now));
        assert!(is_expired(Some(now), now));
        assert!(is_expired(None, now));
        assert!(!is_expired(Some(now + Duration::hours(24)), now));
    }

    #[test]
    fn expired_phone_code_is_rejected() {
        let now = now();
        let check = check_phone_code(
            Some("123456"),
            Some("123456"),
            Some(now - Duration::minutes(1)),
            now,
        );
        assert_eq!(check, PhoneCodeCheck::Expired);
    }

    #[test]
    fn phone_code_outcomes() {
        let now = now();
        let expiry = Some(now + Duration::minutes(15));
        assert_eq!(
            check_phone_code(Some("123456"), Some("123456"), expiry, now),
            PhoneCodeCheck::Verified
        );
        assert_eq!(
            check_phone_code(Some("654321"), Some("123456"), expiry, now),
            PhoneCodeCheck::Mismatch
        );
        assert_eq!(
            check_phone_code(Some("  "), Some("123456"), expiry, now),
            PhoneCodeCheck::Missing
        );
        assert_eq!(
            check_phone_code(Some("123456"), None, expiry, now),
            PhoneCodeCheck::Mismatch
        );
    }

    #[test]
    fn phone_code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_phone_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn phone_number_format() {
        assert!(validate_phone_number("+48123456789").is_ok());
        assert!(validate_phone_number("48123456789").is_err());
        assert!(validate_phone_number("+48 123").is_err());
        assert!(validate_phone_number("+1234").is_err());
    }

    #[test]
    fn email_domain_is_lowercased() {
        assert_eq!(normalize_email(" Jan.Nowak@Example.COM "), "Jan.Nowak@example.com");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn google_username_joins_names() {
        assert_eq!(google_username(Some("Jan"), Some("Kowalski")), "Jan_Kowalski");
        assert_eq!(google_username(Some("Anna Maria"), None), "Anna_Maria_google");
    }
}
