use clap::Args;
use contact_relay::error::AppError;
use contact_relay::intake::{compose, validate, Locale, RawSubmission, SanitizedSubmission};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// JSON submission to process; `-` reads from stdin
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Language for validation messages (`ar` or `en`)
    #[arg(long)]
    pub(crate) locale: Option<String>,
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let locale = match args.locale.as_deref() {
        Some(code) => Locale::from_code(code)
            .ok_or_else(|| AppError::Input(format!("unsupported locale '{code}'")))?,
        None => Locale::default(),
    };

    let body = read_input(&args.input)?;
    print!("{}", render_preview(&body, locale));
    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>, AppError> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read(path)?)
    }
}

pub(crate) fn render_preview(body: &[u8], locale: Locale) -> String {
    let submission = SanitizedSubmission::from_raw(&RawSubmission::from_json(body));
    let outcome = validate(&submission);

    let mut out = String::new();
    out.push_str("Contact submission preview\n");
    out.push_str(&format!("- Name: {}\n", submission.full_name));
    out.push_str(&format!("- Handle: {}\n", submission.telegram));
    out.push_str(&format!("- Level: {}\n", submission.level));

    if !outcome.valid() {
        out.push_str(&format!(
            "Verdict: rejected ({} issue(s))\n",
            outcome.errors().len()
        ));
        for message in outcome.messages(locale) {
            out.push_str(&format!("  - {message}\n"));
        }
        return out;
    }

    let message = compose(&submission);
    out.push_str("Verdict: accepted\n");
    out.push_str(&format!("Subject: {}\n", message.subject));
    out.push_str(&format!("Reply-To: {}\n", message.reply_to));
    out.push('\n');
    out.push_str(&message.text);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepted_submission_prints_subject_and_text() {
        let body = json!({
            "fullName": "Ahmad Al-Sayed",
            "phone": "+962791234567",
            "email": "a@b.com",
            "telegram": "ahmad_99",
            "level": "متوسط",
            "message": "أريد التسجيل",
        });

        let rendered = render_preview(body.to_string().as_bytes(), Locale::Arabic);
        assert!(rendered.contains("Verdict: accepted"));
        assert!(rendered.contains("Subject: طلب تواصل جديد من Ahmad Al-Sayed - متوسط"));
        assert!(rendered.contains("- Handle: @ahmad_99"));
    }

    #[test]
    fn rejected_submission_lists_localized_issues() {
        let rendered = render_preview(b"{}", Locale::English);
        assert!(rendered.contains("Verdict: rejected (6 issue(s))"));
        assert!(rendered.contains("  - Email address is invalid"));
        assert!(!rendered.contains("Subject:"));
    }
}
