/// 회원 관리
/// 가입, 이메일/전화 인증, 로그인 토큰, 비밀번호 재설정, 외부 인증(Google, reCAPTCHA)
pub mod commands;
pub mod external;
pub mod extract;
pub mod model;
pub mod password;
pub mod queries;
pub mod store;
pub mod token;
pub mod verification;
