//! Caller-facing text. Arabic is the form's native language; English is kept
//! for deployments that serve a translated page.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Arabic,
    English,
}

impl Locale {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ar" | "arabic" => Some(Locale::Arabic),
            "en" | "english" => Some(Locale::English),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::Arabic => "ar",
            Locale::English => "en",
        }
    }

    /// Separator placed between joined validation messages.
    pub fn list_separator(self) -> &'static str {
        match self {
            Locale::Arabic => "، ",
            Locale::English => ", ",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fixed replies that do not depend on the submission itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Accepted,
    MethodNotAllowed,
    ServerMisconfigured,
    DeliveryFailed,
    ProcessingFailed,
    NotFound,
}

impl Notice {
    pub fn text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Notice::Accepted, Locale::Arabic) => "تم إرسال طلبك بنجاح! سنقوم بالرد عليك قريباً.",
            (Notice::Accepted, Locale::English) => {
                "Your request was sent successfully! We will get back to you soon."
            }
            (Notice::MethodNotAllowed, Locale::Arabic) => "الطريقة غير مسموحة",
            (Notice::MethodNotAllowed, Locale::English) => "Method not allowed",
            (Notice::ServerMisconfigured, Locale::Arabic) => {
                "خطأ في إعدادات الخادم. يرجى التواصل مع الدعم الفني."
            }
            (Notice::ServerMisconfigured, Locale::English) => {
                "Server configuration error. Please contact technical support."
            }
            (Notice::DeliveryFailed, Locale::Arabic) => {
                "حدث خطأ أثناء إرسال البريد الإلكتروني. يرجى المحاولة مرة أخرى لاحقاً."
            }
            (Notice::DeliveryFailed, Locale::English) => {
                "An error occurred while sending the email. Please try again later."
            }
            (Notice::ProcessingFailed, Locale::Arabic) => {
                "حدث خطأ أثناء معالجة طلبك. يرجى المحاولة مرة أخرى لاحقاً."
            }
            (Notice::ProcessingFailed, Locale::English) => {
                "An error occurred while processing your request. Please try again later."
            }
            (Notice::NotFound, Locale::Arabic) => "المسار غير موجود",
            (Notice::NotFound, Locale::English) => "Endpoint not found",
        }
    }
}

/// Rate-limit reply naming how many minutes the caller has to wait.
pub fn rate_limited(locale: Locale, retry_after_secs: u64) -> String {
    let minutes = retry_after_secs.div_ceil(60).max(1);
    match locale {
        Locale::Arabic => {
            format!("تم تجاوز الحد المسموح. يرجى المحاولة مرة أخرى بعد {minutes} دقيقة.")
        }
        Locale::English => {
            let unit = if minutes == 1 { "minute" } else { "minutes" };
            format!("Too many requests. Please try again in {minutes} {unit}.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locale_codes() {
        assert_eq!(Locale::from_code("AR"), Some(Locale::Arabic));
        assert_eq!(Locale::from_code(" english "), Some(Locale::English));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::default(), Locale::Arabic);
    }

    #[test]
    fn rate_limit_text_rounds_minutes_up() {
        assert_eq!(
            rate_limited(Locale::Arabic, 900),
            "تم تجاوز الحد المسموح. يرجى المحاولة مرة أخرى بعد 15 دقيقة."
        );
        assert_eq!(
            rate_limited(Locale::English, 61),
            "Too many requests. Please try again in 2 minutes."
        );
        assert_eq!(
            rate_limited(Locale::English, 1),
            "Too many requests. Please try again in 1 minute."
        );
    }
}
