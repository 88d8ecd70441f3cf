/// Brazilian document and contact validators used by the onboarding forms
///
/// - CPF check-digit validation
/// - E-mail format and placeholder detection
/// - Brazilian phone parsing and E.164 normalization
/// - Birth date parsing (DD/MM/YYYY or YYYY-MM-DD)
use chrono::NaiveDate;
use phonenumber::country::Id as CountryId;
use phonenumber::Mode;
use regex::Regex;
use std::sync::OnceLock;

/// Keeps only the ASCII digits of `raw` (strips `.`, `-`, `/`, spaces).
pub fn only_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Computes one CPF verification digit over `digits`.
///
/// Weights start at `digits.len() + 1` and decrease to 2.
fn cpf_check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    let rest = (sum * 10) % 11;
    if rest == 10 {
        0
    } else {
        rest
    }
}

/// Completes a 9-digit CPF base with its two verification digits.
///
/// Returns `None` when `base` does not contain exactly nine digits.
pub fn cpf_with_check_digits(base: &str) -> Option<String> {
    let digits: Vec<u32> = only_digits(base)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();
    if digits.len() != 9 {
        return None;
    }

    let first = cpf_check_digit(&digits);
    let mut with_first = digits.clone();
    with_first.push(first);
    let second = cpf_check_digit(&with_first);

    let mut cpf: String = digits.iter().map(|d| d.to_string()).collect();
    cpf.push_str(&first.to_string());
    cpf.push_str(&second.to_string());
    Some(cpf)
}

/// Validate CPF
///
/// Accepts formatted (`529.982.247-25`) or bare (`52998224725`) input.
/// Rejects wrong length, repeated-digit sequences (`111.111.111-11`) and
/// wrong verification digits.
pub fn is_valid_cpf(raw: &str) -> bool {
    let cpf = only_digits(raw);
    if cpf.len() != 11 {
        return false;
    }

    // Repeated sequences pass the checksum but are never issued
    if cpf.chars().all(|c| Some(c) == cpf.chars().next()) {
        tracing::warn!("❌ Invalid CPF detected (repeated digits)");
        return false;
    }

    match cpf_with_check_digits(&cpf[..9]) {
        Some(expected) => expected == cpf,
        None => false,
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified: local@domain.tld, at least one dot in the domain
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("email regex is valid")
    })
}

/// Masks an e-mail for logs: `maria@example.com` → `ma***@example.com`.
fn redact_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let visible: String = local.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        None => "***".to_string(),
    }
}

/// Masks a phone for logs, keeping only the last four digits.
fn redact_phone(phone: &str) -> String {
    let digits = only_digits(phone);
    let tail: String = digits
        .chars()
        .skip(digits.chars().count().saturating_sub(4))
        .collect();
    format!("***{}", tail)
}

/// Validate email address
///
/// Checks for:
/// - Basic email format (contains @ and a dotted domain)
/// - Fake/placeholder patterns (repeated digits like 9999, 1111)
/// - Minimum length requirements
///
/// Surrounding whitespace is ignored.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    let fake_patterns = ["999999", "111111", "000000", "123456789"];
    if let Some(pattern) = fake_patterns.iter().find(|p| email.contains(*p)) {
        tracing::warn!(
            "❌ Invalid email detected (fake pattern '{}'): {}",
            pattern,
            redact_email(email)
        );
        return false;
    }

    if !email_regex().is_match(email) {
        tracing::warn!("❌ Invalid email format: {}", redact_email(email));
        return false;
    }

    true
}

/// Validate and normalize a Brazilian phone number
///
/// Parses with the BR region, checks validity and returns the E.164 form
/// (`+5511987654321`). The error carries a short reason for logs.
pub fn normalize_br_phone(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() || raw.len() < 8 {
        return Err("Phone too short".to_string());
    }

    match phonenumber::parse(Some(CountryId::BR), raw) {
        Ok(number) => {
            if phonenumber::is_valid(&number) {
                let formatted = number.format().mode(Mode::E164).to_string();
                tracing::debug!("✓ Valid BR phone: {}", redact_phone(&formatted));
                Ok(formatted)
            } else {
                tracing::warn!("❌ Invalid BR phone number: {}", redact_phone(raw));
                Err("Invalid Brazilian phone number".to_string())
            }
        }
        Err(e) => {
            tracing::warn!("❌ Failed to parse BR phone '{}': {:?}", redact_phone(raw), e);
            Err(format!("Parse error: {:?}", e))
        }
    }
}

/// Parses a birth date typed as `DD/MM/YYYY` or sent as `YYYY-MM-DD`.
///
/// Dates after `today` are rejected.
pub fn parse_birth_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;

    if date > today {
        tracing::warn!("❌ Birth date in the future");
        return None;
    }

    Some(date)
}
