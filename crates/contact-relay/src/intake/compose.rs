use std::fmt::Write as _;

use serde::Serialize;

use super::domain::SanitizedSubmission;

const INSTITUTE_HEADER: &str = "طلب تواصل جديد من موقع Linguaskill Institute";
const FOOTER_NOTICE: &str = "تم إرسال هذه الرسالة تلقائياً من نموذج التواصل في الموقع";
const FOOTER_REPLY: &str = "يمكنك الرد مباشرة على:";

const STYLE: &str = "body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; } \
.container { max-width: 600px; margin: 0 auto; padding: 20px; } \
.header { background: #f4f4f4; padding: 20px; border-radius: 5px; margin-bottom: 20px; } \
.field { margin-bottom: 15px; } \
.label { font-weight: bold; color: #666; } \
.value { padding: 10px; background: #f9f9f9; border-radius: 3px; margin-top: 5px; } \
.footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd; font-size: 12px; color: #999; }";

struct Label {
    arabic: &'static str,
    english: &'static str,
}

impl Label {
    fn render(&self) -> String {
        format!("{} / {}", self.arabic, self.english)
    }
}

const NAME: Label = Label {
    arabic: "الاسم الكامل",
    english: "Full name",
};
const PHONE: Label = Label {
    arabic: "رقم الهاتف",
    english: "Phone",
};
const EMAIL: Label = Label {
    arabic: "البريد الإلكتروني",
    english: "Email",
};
const HANDLE: Label = Label {
    arabic: "معرف التلجرام",
    english: "Telegram",
};
const LEVEL: Label = Label {
    arabic: "المستوى المطلوب",
    english: "Requested level",
};
const MESSAGE: Label = Label {
    arabic: "الرسالة",
    english: "Message",
};

/// Notification derived from one submission. Sender and recipient are added by
/// the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: String,
}

pub fn compose(submission: &SanitizedSubmission) -> EmailMessage {
    EmailMessage {
        subject: format!(
            "طلب تواصل جديد من {} - {}",
            submission.full_name, submission.level
        ),
        html: render_html(submission),
        text: render_text(submission),
        reply_to: submission.email.clone(),
    }
}

fn render_html(submission: &SanitizedSubmission) -> String {
    let email = escape_html(&submission.email);
    let handle_link = format!("https://t.me/{}", submission.handle_body());

    let mut html = String::with_capacity(2048);
    html.push_str("<!DOCTYPE html><html dir=\"rtl\" lang=\"ar\"><head><meta charset=\"UTF-8\">");
    writeln!(html, "<style>{STYLE}</style></head><body><div class=\"container\">")
        .expect("document head");
    writeln!(
        html,
        "<div class=\"header\"><h2>{}</h2></div>",
        escape_html(INSTITUTE_HEADER)
    )
    .expect("header");

    push_field(&mut html, &NAME, &escape_html(&submission.full_name));
    push_field(&mut html, &PHONE, &escape_html(&submission.phone));
    push_field(
        &mut html,
        &EMAIL,
        &format!("<a href=\"mailto:{email}\">{email}</a>"),
    );
    push_field(
        &mut html,
        &HANDLE,
        &format!(
            "<a href=\"{}\" target=\"_blank\">{}</a>",
            escape_html(&handle_link),
            escape_html(&submission.telegram)
        ),
    );
    push_field(&mut html, &LEVEL, &escape_html(&submission.level));
    push_field(
        &mut html,
        &MESSAGE,
        &escape_html(&submission.message).replace('\n', "<br>"),
    );

    writeln!(
        html,
        "<div class=\"footer\"><p>{FOOTER_NOTICE}</p><p>{FOOTER_REPLY} <a href=\"mailto:{email}\">{email}</a></p></div>"
    )
    .expect("footer");
    html.push_str("</div></body></html>");
    html
}

fn push_field(html: &mut String, label: &Label, value: &str) {
    writeln!(
        html,
        "<div class=\"field\"><div class=\"label\">{}:</div><div class=\"value\">{value}</div></div>",
        label.render()
    )
    .expect("field block");
}

fn render_text(submission: &SanitizedSubmission) -> String {
    let mut text = String::with_capacity(512);
    writeln!(text, "{INSTITUTE_HEADER}\n").expect("text header");
    for (label, value) in [
        (&NAME, &submission.full_name),
        (&PHONE, &submission.phone),
        (&EMAIL, &submission.email),
        (&HANDLE, &submission.telegram),
        (&LEVEL, &submission.level),
    ] {
        writeln!(text, "{}: {value}", label.render()).expect("text field");
    }
    writeln!(text, "\n{}:\n{}\n", MESSAGE.render(), submission.message).expect("text message");
    writeln!(text, "---\n{FOOTER_NOTICE}").expect("text footer");
    write!(text, "{FOOTER_REPLY} {}", submission.email).expect("text reply line");
    text
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
