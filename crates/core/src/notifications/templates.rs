use super::EmailMessage;

fn link(frontend_url: &str, path: &str, token: &str) -> String {
    format!("{}{}?token={}", frontend_url.trim_end_matches('/'), path, token)
}

pub fn verification_email(frontend_url: &str, email: &str, token: &str) -> EmailMessage {
    let url = link(frontend_url, "/auth/new-verification", token);
    EmailMessage {
        to: email.to_string(),
        subject: "Confirm your email".to_string(),
        html: format!("<p>Click <a href=\"{url}\">here</a> to confirm email.</p>"),
    }
}

pub fn password_reset_email(frontend_url: &str, email: &str, token: &str) -> EmailMessage {
    let url = link(frontend_url, "/auth/new-password", token);
    EmailMessage {
        to: email.to_string(),
        subject: "Reset your password".to_string(),
        html: format!("<p>Click <a href=\"{url}\">here</a> to reset password.</p>"),
    }
}

pub fn two_factor_email(email: &str, code: &str) -> EmailMessage {
    EmailMessage {
        to: email.to_string(),
        subject: "2FA Code".to_string(),
        html: format!("<p>Your 2FA code: {code}</p>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_link_carries_token() {
        let msg = password_reset_email("https://app.example/", "a@b.co", "abc");
        assert_eq!(msg.to, "a@b.co");
        assert!(msg
            .html
            .contains("https://app.example/auth/new-password?token=abc"));
    }
}
