//! Email bodies for a contact submission.

use super::submission::ContactSubmission;
use crate::config::MailConfig;

pub fn subject(submission: &ContactSubmission) -> String {
    format!("Portfolio Contact: Message from {}", submission.name())
}

pub fn render_text(submission: &ContactSubmission) -> String {
    let phone_line = submission
        .phone()
        .map(|phone| format!("Phone: {phone}\n"))
        .unwrap_or_default();

    format!(
        "New Contact Form Submission\n\nFrom: {}\nEmail: {}\n{phone_line}\n{}\n",
        submission.name(),
        submission.email(),
        submission.message(),
    )
}

pub fn render_html(submission: &ContactSubmission, mail: &MailConfig, year: i32) -> String {
    let phone_row = submission
        .phone()
        .map(|phone| {
            format!(
                r#"<p style="margin: 8px 0;"><strong>Phone:</strong> {}</p>"#,
                escape(phone)
            )
        })
        .unwrap_or_default();

    let portfolio_row = mail
        .portfolio_url
        .as_deref()
        .map(|url| {
            let url = escape(url);
            format!(
                r#"<p style="color: #666; font-size: 14px; margin: 5px 0;">Portfolio: <a href="{url}" style="color: #0066cc; text-decoration: none;">{url}</a></p>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div style="font-family: Poppins, Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #ddd; border-radius: 8px;">
  <div style="background-color: #0066cc; color: white; padding: 15px; border-radius: 6px 6px 0 0; text-align: center;">
    <h1 style="margin: 0; font-size: 24px;">New Contact Form Submission</h1>
  </div>
  <div style="padding: 20px; background-color: #f9f9f9; border-bottom: 1px solid #eee;">
    <p style="margin: 8px 0;"><strong>From:</strong> {name}</p>
    <p style="margin: 8px 0;"><strong>Email:</strong> {email}</p>
    {phone_row}
    <p style="margin: 12px 0 8px;"><strong>Message:</strong></p>
    <p style="margin: 8px 0; padding: 12px; background-color: white; border-left: 4px solid #0066cc; border-radius: 4px; white-space: pre-wrap;">{message}</p>
  </div>
  <div style="padding: 20px; background-color: white;">
    <div style="text-align: center; margin-bottom: 15px;">
      <h2 style="color: #0066cc; margin: 0; font-size: 22px;">{owner}</h2>
      <p style="color: #666; font-style: italic; margin: 5px 0;">{title}</p>
    </div>
    <p style="line-height: 1.6; color: #333;">You have received a new message through your portfolio website contact form. Reply to this email to answer the sender directly.</p>
    <div style="margin-top: 20px; text-align: center; padding-top: 15px; border-top: 1px solid #eee;">
      {portfolio_row}
      <p style="color: #666; font-size: 14px; margin: 5px 0;">&copy; {year} {owner}. All rights reserved.</p>
    </div>
  </div>
</div>"#,
        name = escape(submission.name()),
        email = escape(submission.email()),
        message = escape(submission.message()),
        owner = escape(&mail.owner_name),
        title = escape(&mail.owner_title),
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
