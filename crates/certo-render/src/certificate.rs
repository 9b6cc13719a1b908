//! Certificate layout.
//!
//! One A4-landscape page. The layout is fixed: coordinates below are
//! absolute page positions in points, origin bottom-left. Optional
//! fields collapse — an absent course description omits its lines
//! entirely rather than rendering a placeholder.

use chrono::{DateTime, Utc};
use url::Url;

use certo_core::VerificationCode;

use crate::error::RenderError;
use crate::pdf::{self, Content, Font};

// A4 landscape, in points.
const PAGE_WIDTH: f64 = 842.0;
const PAGE_HEIGHT: f64 = 595.0;
const CENTER_X: f64 = PAGE_WIDTH / 2.0;

// Layout limits. Overflowing these is a caller error, not a truncation.
const MAX_NAME_LEN: usize = 100;
const MAX_TITLE_LEN: usize = 140;

// Description wrapping: at most three lines; overflow is elided.
const DESCRIPTION_LINE_CHARS: usize = 110;
const DESCRIPTION_MAX_LINES: usize = 3;

/// Renderer configuration, injected at construction time.
///
/// An explicit struct with enumerated fields — issuer identity and the
/// public verification base URL are configuration, and business logic
/// never reads them from the ambient environment.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Name of the issuing organization, shown in the header.
    pub issuer_name: String,
    /// Optional one-line tagline under the issuer name.
    pub issuer_tagline: Option<String>,
    /// Public base URL of the verification endpoint. The footer prints
    /// `{verify_base_url}/verify/{code}`.
    pub verify_base_url: Url,
}

impl RenderConfig {
    /// Create a configuration with no tagline.
    pub fn new(issuer_name: impl Into<String>, verify_base_url: Url) -> Self {
        Self {
            issuer_name: issuer_name.into(),
            issuer_tagline: None,
            verify_base_url,
        }
    }

    /// The human-readable verification URL for a code.
    pub fn verification_url(&self, code: &VerificationCode) -> String {
        format!(
            "{}/verify/{}",
            self.verify_base_url.as_str().trim_end_matches('/'),
            code
        )
    }
}

/// Everything the layout needs about one credential.
///
/// Assembled by the caller from the credential record (code, issue date)
/// and the directory (names and titles) — the renderer itself performs
/// no lookups.
#[derive(Debug, Clone)]
pub struct CertificateData {
    /// The learner's display name.
    pub recipient_name: String,
    /// The course title.
    pub course_title: String,
    /// Optional course description. Empty or absent values are omitted
    /// from the page.
    pub course_description: Option<String>,
    /// When the credential was issued.
    pub issued_at: DateTime<Utc>,
    /// The credential's verification code.
    pub verification_code: VerificationCode,
}

/// Render a certificate to PDF bytes.
///
/// Pure transformation: identical input produces identical bytes within
/// one renderer version. Fails only when a field exceeds its layout
/// limit; failures never affect the underlying credential.
pub fn render_certificate(
    config: &RenderConfig,
    data: &CertificateData,
) -> Result<Vec<u8>, RenderError> {
    if data.recipient_name.chars().count() > MAX_NAME_LEN {
        return Err(RenderError::FieldTooLong {
            field: "recipient name",
            max: MAX_NAME_LEN,
        });
    }
    if data.course_title.chars().count() > MAX_TITLE_LEN {
        return Err(RenderError::FieldTooLong {
            field: "course title",
            max: MAX_TITLE_LEN,
        });
    }

    let mut content = Content::new();

    // Double border.
    content.rect(30.0, 30.0, PAGE_WIDTH - 60.0, PAGE_HEIGHT - 60.0, 2.0);
    content.rect(38.0, 38.0, PAGE_WIDTH - 76.0, PAGE_HEIGHT - 76.0, 0.8);

    // Issuer block.
    content.text_centered(Font::Bold, 14.0, CENTER_X, 530.0, &config.issuer_name);
    if let Some(tagline) = config
        .issuer_tagline
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        content.text_centered(Font::Regular, 9.0, CENTER_X, 514.0, tagline);
    }

    // Title block.
    content.text_centered(Font::Bold, 30.0, CENTER_X, 452.0, "Certificate of Completion");
    content.text_centered(Font::Regular, 12.0, CENTER_X, 404.0, "This certifies that");

    // Recipient.
    content.text_centered(Font::Bold, 24.0, CENTER_X, 364.0, &data.recipient_name);
    content.text_centered(
        Font::Regular,
        12.0,
        CENTER_X,
        328.0,
        "has successfully completed the course",
    );

    // Course.
    content.text_centered(Font::Bold, 18.0, CENTER_X, 294.0, &data.course_title);
    let mut cursor_y = 268.0;
    if let Some(description) = data
        .course_description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
    {
        for line in wrap_description(description) {
            content.text_centered(Font::Regular, 10.0, CENTER_X, cursor_y, &line);
            cursor_y -= 14.0;
        }
    }

    // Issue date.
    let issued = format!("Issued on {}", data.issued_at.format("%d %B %Y"));
    content.text_centered(Font::Regular, 11.0, CENTER_X, 196.0, &issued);

    // Signature-line placeholders, deliberately unlabeled.
    content.hline(120.0, 330.0, 126.0, 0.8);
    content.hline(512.0, 722.0, 126.0, 0.8);

    // Footer: the code and where to check it.
    let code_line = format!("Verification code: {}", data.verification_code);
    content.text_centered(Font::Regular, 9.0, CENTER_X, 72.0, &code_line);
    let url_line = format!(
        "Verify at {}",
        config.verification_url(&data.verification_code)
    );
    content.text_centered(Font::Regular, 9.0, CENTER_X, 58.0, &url_line);

    Ok(pdf::build_document(PAGE_WIDTH, PAGE_HEIGHT, content))
}

/// Greedy word wrap for the description block.
///
/// At most [`DESCRIPTION_MAX_LINES`] lines; anything beyond is elided
/// with an ellipsis. Single words longer than a line are hard-split.
fn wrap_description(description: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in description.split_whitespace() {
        let mut word = word;
        while !word.is_empty() {
            let candidate_len = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };

            if candidate_len <= DESCRIPTION_LINE_CHARS {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                word = "";
            } else if current.is_empty() {
                // Hard-split an oversized word.
                let split_at = word
                    .char_indices()
                    .nth(DESCRIPTION_LINE_CHARS)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                current.push_str(&word[..split_at]);
                word = &word[split_at..];
            } else {
                lines.push(std::mem::take(&mut current));
                if lines.len() == DESCRIPTION_MAX_LINES {
                    elide_last(&mut lines);
                    return lines;
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn elide_last(lines: &mut [String]) {
    if let Some(last) = lines.last_mut() {
        last.push('\u{2026}');
    }
}
