/// 이메일 본문 템플릿 (tera)
// region:    --- Imports
use crate::bidding::model::Auction;
use lazy_static::lazy_static;
use regex::Regex;
use tera::{Context, Tera};
// endregion: --- Imports

lazy_static! {
    static ref P_OPEN: Regex = Regex::new(r"<p\s*[^>]*>").expect("valid regex");
    static ref P_CLOSE: Regex = Regex::new(r"</p>").expect("valid regex");
    static ref BR: Regex = Regex::new(r"<br\s*/?>").expect("valid regex");
    static ref ANY_TAG: Regex = Regex::new(r"<.*?>").expect("valid regex");
}

// tera 자동 이스케이프가 만드는 엔티티 (`&amp;` 는 마지막)
const HTML_ENTITIES: [(&str, &str); 6] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#x27;", "'"),
    ("&#x2F;", "/"),
    ("&amp;", "&"),
];

/// HTML 본문에서 텍스트 대체 본문 생성
pub fn strip_html_tags(html: &str) -> String {
    let text = P_OPEN.replace_all(html, "\n\n");
    let text = P_CLOSE.replace_all(&text, "\n\n");
    let text = BR.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    HTML_ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}

#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// 요청 폼 내용 (문의, 경매 출품 요청 공용)
#[derive(Debug, Clone)]
pub struct FormSender<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

pub struct EmailTemplates {
    tera: Tera,
    frontend_url: String,
}

impl EmailTemplates {
    pub fn new(frontend_url: &str) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("new_bid.html", include_str!("../../templates/email/new_bid.html")),
            ("verify_email.html", include_str!("../../templates/email/verify_email.html")),
            ("reset_password.html", include_str!("../../templates/email/reset_password.html")),
            ("auction_request.html", include_str!("../../templates/email/auction_request.html")),
            ("contact_message.html", include_str!("../../templates/email/contact_message.html")),
        ])?;
        Ok(Self {
            tera,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        })
    }

    fn render(&self, name: &str, subject: String, context: &Context) -> Result<RenderedEmail, tera::Error> {
        let html = self.tera.render(name, context)?;
        Ok(RenderedEmail {
            subject,
            text: strip_html_tags(&html),
            html,
        })
    }

    pub fn verification_url(&self, token: &str) -> String {
        format!("{}/verify-email/{}/", self.frontend_url, token)
    }

    pub fn reset_url(&self, token: &str) -> String {
        format!("{}/reset-password/{}/", self.frontend_url, token)
    }

    pub fn new_bid(&self, auction: &Auction) -> Result<RenderedEmail, tera::Error> {
        let mut context = Context::new();
        context.insert("auction", auction);
        context.insert(
            "auction_url",
            &format!("{}/auctions/{}", self.frontend_url, auction.id),
        );
        self.render(
            "new_bid.html",
            format!("New Bid on Auction: {}", auction.title),
            &context,
        )
    }

    pub fn verify_email(&self, username: &str, email: &str, token: &str) -> Result<RenderedEmail, tera::Error> {
        let mut context = Context::new();
        context.insert("username", username);
        context.insert("email", email);
        context.insert("verification_url", &self.verification_url(token));
        self.render("verify_email.html", "Verify your email".to_string(), &context)
    }

    pub fn reset_password(&self, username: &str, email: &str, token: &str) -> Result<RenderedEmail, tera::Error> {
        let mut context = Context::new();
        context.insert("username", username);
        context.insert("email", email);
        context.insert("reset_url", &self.reset_url(token));
        self.render("reset_password.html", "Password Reset Request".to_string(), &context)
    }

    pub fn auction_request(&self, sender: &FormSender<'_>, message: &str) -> Result<RenderedEmail, tera::Error> {
        let mut context = sender_context(sender);
        context.insert("message", message);
        self.render("auction_request.html", "New Auction Request".to_string(), &context)
    }

    pub fn contact_message(&self, sender: &FormSender<'_>, text: &str) -> Result<RenderedEmail, tera::Error> {
        let mut context = sender_context(sender);
        context.insert("text", text);
        self.render(
            "contact_message.html",
            format!("Contact form: {} {}", sender.first_name, sender.last_name),
            &context,
        )
    }
}

fn sender_context(sender: &FormSender<'_>) -> Context {
    let mut context = Context::new();
    context.insert("first_name", sender.first_name);
    context.insert("last_name", sender.last_name);
    context.insert("email", sender.email);
    context
}
