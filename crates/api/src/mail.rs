//! Account mail: temporary passwords, reset links and ad-hoc messages.
//!
//! Bodies are HTML; every user-supplied value is escaped before it is
//! interpolated.

use ingetech_db::models::user::User;
use ingetech_dispatch::channels::email::escape_html;
use ingetech_dispatch::{EmailError, EmailSender};

/// Maximum subject length of an ad-hoc email.
pub const MAX_SUBJECT_CHARS: usize = 200;
/// Maximum body length of an ad-hoc email.
pub const MAX_MESSAGE_CHARS: usize = 5000;

pub const TEMPORARY_PASSWORD_SUBJECT: &str = "Su nueva contraseña temporal";
pub const RESET_SUBJECT: &str = "Restablecer contraseña - IngeTech CRM";

/// Validate the subject and message of an ad-hoc email.
pub fn validate_direct_message(subject: &str, message: &str) -> Result<(), String> {
    if subject.trim().is_empty() {
        return Err("Subject is required".to_string());
    }
    if subject.chars().count() > MAX_SUBJECT_CHARS {
        return Err(format!(
            "Subject cannot exceed {MAX_SUBJECT_CHARS} characters"
        ));
    }
    if message.trim().is_empty() {
        return Err("Message is required".to_string());
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(format!(
            "Message cannot exceed {MAX_MESSAGE_CHARS} characters"
        ));
    }
    Ok(())
}

pub fn temporary_password_html(full_name: &str, password: &str) -> String {
    format!(
        "<h2>Contraseña Temporal Generada</h2>\
         <p>Hola {name},</p>\
         <p>Se ha generado una <strong>contraseña temporal</strong> para su cuenta en IngeTech CRM.</p>\
         <p>Su nueva contraseña temporal es:</p>\
         <p style=\"font-size:20px;font-family:monospace;font-weight:bold\">{password}</p>\
         <p>Por seguridad, cámbiela inmediatamente después de iniciar sesión.</p>",
        name = escape_html(full_name),
        password = escape_html(password),
    )
}

pub fn reset_link_html(full_name: &str, link: &str) -> String {
    format!(
        "<h2>Restablecer contraseña</h2>\
         <p>Hola {name},</p>\
         <p>Recibimos una solicitud para restablecer su contraseña en IngeTech CRM.</p>\
         <p><a href=\"{link}\">Restablecer contraseña</a></p>\
         <p>El enlace vence en 24 horas. Si usted no hizo la solicitud, ignore este mensaje.</p>",
        name = escape_html(full_name),
        link = escape_html(link),
    )
}

/// Wrap an ad-hoc message: escaped, with line breaks preserved.
pub fn direct_message_html(full_name: &str, message: &str) -> String {
    let body = escape_html(message).replace('\n', "<br>");
    format!(
        "<p>Hola {name},</p><div>{body}</div><hr><p>IngeTech CRM</p>",
        name = escape_html(full_name),
    )
}

pub async fn send_temporary_password(
    mailer: &EmailSender,
    user: &User,
    password: &str,
) -> Result<(), EmailError> {
    mailer
        .send_html(
            &user.email,
            TEMPORARY_PASSWORD_SUBJECT,
            &temporary_password_html(&user.full_name, password),
        )
        .await
}

pub async fn send_reset_link(
    mailer: &EmailSender,
    user: &User,
    link: &str,
) -> Result<(), EmailError> {
    mailer
        .send_html(&user.email, RESET_SUBJECT, &reset_link_html(&user.full_name, link))
        .await
}

pub async fn send_direct_message(
    mailer: &EmailSender,
    user: &User,
    subject: &str,
    message: &str,
) -> Result<(), EmailError> {
    mailer
        .send_html(
            &user.email,
            subject.trim(),
            &direct_message_html(&user.full_name, message),
        )
        .await
}
