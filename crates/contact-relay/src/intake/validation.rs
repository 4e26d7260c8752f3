use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::domain::{ProficiencyLevel, SanitizedSubmission};
use super::messages::Locale;

const MIN_NAME_CHARS: usize = 2;
const MIN_PHONE_DIGITS: usize = 8;
const MIN_MESSAGE_CHARS: usize = 10;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-\s()]+$").expect("valid phone pattern"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static HANDLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{5,32}$").expect("valid handle pattern"));

/// One rule broken by one field. Each field contributes at most one violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldViolation {
    NameTooShort,
    PhoneInvalid,
    EmailInvalid,
    HandleRequired,
    HandleInvalid,
    LevelRequired,
    LevelInvalid,
    MessageTooShort,
}

impl FieldViolation {
    /// Wire name of the offending form field.
    pub fn field(self) -> &'static str {
        match self {
            FieldViolation::NameTooShort => "fullName",
            FieldViolation::PhoneInvalid => "phone",
            FieldViolation::EmailInvalid => "email",
            FieldViolation::HandleRequired | FieldViolation::HandleInvalid => "telegram",
            FieldViolation::LevelRequired | FieldViolation::LevelInvalid => "level",
            FieldViolation::MessageTooShort => "message",
        }
    }

    pub fn message(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Arabic => match self {
                FieldViolation::NameTooShort => "الاسم يجب أن يكون أكثر من حرفين",
                FieldViolation::PhoneInvalid => "رقم الهاتف غير صحيح",
                FieldViolation::EmailInvalid => "البريد الإلكتروني غير صحيح",
                FieldViolation::HandleRequired => "معرف التلجرام مطلوب",
                FieldViolation::HandleInvalid => "معرف التلجرام غير صحيح",
                FieldViolation::LevelRequired => "المستوى مطلوب",
                FieldViolation::LevelInvalid => "المستوى غير صحيح",
                FieldViolation::MessageTooShort => "الرسالة يجب أن تكون أكثر من 10 أحرف",
            },
            Locale::English => match self {
                FieldViolation::NameTooShort => "Full name must be at least 2 characters",
                FieldViolation::PhoneInvalid => "Phone number is invalid",
                FieldViolation::EmailInvalid => "Email address is invalid",
                FieldViolation::HandleRequired => "Telegram handle is required",
                FieldViolation::HandleInvalid => "Telegram handle is invalid",
                FieldViolation::LevelRequired => "Level is required",
                FieldViolation::LevelInvalid => "Level is invalid",
                FieldViolation::MessageTooShort => "Message must be at least 10 characters",
            },
        }
    }
}

/// Result of checking every field of a sanitized submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    errors: Vec<FieldViolation>,
}

impl ValidationOutcome {
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Violations in field order: name, phone, email, handle, level, message.
    pub fn errors(&self) -> &[FieldViolation] {
        &self.errors
    }

    pub fn messages(&self, locale: Locale) -> Vec<String> {
        self.errors
            .iter()
            .map(|violation| violation.message(locale).to_string())
            .collect()
    }

    pub fn summary(&self, locale: Locale) -> String {
        self.messages(locale).join(locale.list_separator())
    }
}

/// Checks every rule; nothing short-circuits.
pub fn validate(submission: &SanitizedSubmission) -> ValidationOutcome {
    let checks = [
        check_name(&submission.full_name),
        check_phone(&submission.phone),
        check_email(&submission.email),
        check_handle(submission),
        check_level(&submission.level),
        check_message(&submission.message),
    ];

    ValidationOutcome {
        errors: checks.into_iter().flatten().collect(),
    }
}

fn check_name(name: &str) -> Option<FieldViolation> {
    (name.trim().chars().count() < MIN_NAME_CHARS).then_some(FieldViolation::NameTooShort)
}

fn check_phone(phone: &str) -> Option<FieldViolation> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if PHONE_PATTERN.is_match(phone) && digits >= MIN_PHONE_DIGITS {
        None
    } else {
        Some(FieldViolation::PhoneInvalid)
    }
}

fn check_email(email: &str) -> Option<FieldViolation> {
    (!EMAIL_PATTERN.is_match(email)).then_some(FieldViolation::EmailInvalid)
}

fn check_handle(submission: &SanitizedSubmission) -> Option<FieldViolation> {
    if submission.telegram.trim().is_empty() {
        return Some(FieldViolation::HandleRequired);
    }
    (!HANDLE_PATTERN.is_match(submission.handle_body())).then_some(FieldViolation::HandleInvalid)
}

fn check_level(level: &str) -> Option<FieldViolation> {
    if level.trim().is_empty() {
        Some(FieldViolation::LevelRequired)
    } else if ProficiencyLevel::parse(level).is_none() {
        Some(FieldViolation::LevelInvalid)
    } else {
        None
    }
}

fn check_message(message: &str) -> Option<FieldViolation> {
    (message.trim().chars().count() < MIN_MESSAGE_CHARS).then_some(FieldViolation::MessageTooShort)
}
