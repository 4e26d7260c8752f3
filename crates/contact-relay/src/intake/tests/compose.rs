use super::common::*;

use crate::intake::compose::{compose, escape_html};
use crate::intake::domain::SanitizedSubmission;

#[test]
fn subject_names_sender_and_level() {
    let message = compose(&canonical());
    assert_eq!(message.subject, "طلب تواصل جديد من Ahmad Al-Sayed - متوسط");
    assert_eq!(message.reply_to, "a@b.com");
}

#[test]
fn html_is_right_to_left_with_links() {
    let message = compose(&canonical());
    assert!(message.html.starts_with("<!DOCTYPE html><html dir=\"rtl\" lang=\"ar\">"));
    assert!(message.html.contains("طلب تواصل جديد من موقع Linguaskill Institute"));
    assert!(message.html.contains("<a href=\"mailto:a@b.com\">a@b.com</a>"));
    assert!(message
        .html
        .contains("<a href=\"https://t.me/ahmad_99\" target=\"_blank\">@ahmad_99</a>"));
    assert!(message.html.contains("الاسم الكامل / Full name:"));
    assert!(message.html.contains("المستوى المطلوب / Requested level:"));
}

#[test]
fn text_body_lists_every_field() {
    let message = compose(&canonical());
    for line in [
        "الاسم الكامل / Full name: Ahmad Al-Sayed",
        "رقم الهاتف / Phone: +962791234567",
        "البريد الإلكتروني / Email: a@b.com",
        "معرف التلجرام / Telegram: @ahmad_99",
        "المستوى المطلوب / Requested level: متوسط",
        "أريد التسجيل",
        "يمكنك الرد مباشرة على: a@b.com",
    ] {
        assert!(message.text.contains(line), "missing line {line:?}");
    }
    assert!(!message.text.contains('<'));
}

#[test]
fn interpolated_values_are_escaped() {
    let submission = SanitizedSubmission {
        full_name: "Tom & \"Jerry\"".to_string(),
        message: "1 < 2 > 0 it's\nsecond line".to_string(),
        ..canonical()
    };

    let message = compose(&submission);
    assert!(message.html.contains("Tom &amp; &quot;Jerry&quot;"));
    assert!(message
        .html
        .contains("1 &lt; 2 &gt; 0 it&#39;s<br>second line"));
    assert!(!message.html.contains("Tom & \"Jerry\""));
}

#[test]
fn composition_is_deterministic() {
    assert_eq!(compose(&canonical()), compose(&canonical()));
}

#[test]
fn escape_html_covers_all_significant_characters() {
    assert_eq!(escape_html("<a href='x'>&\"</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&quot;&lt;/a&gt;");
    assert_eq!(escape_html("مرحبا"), "مرحبا");
}
