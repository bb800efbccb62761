//! Session cookie attributes

use crate::config::AppConfig;

/// How the session token is set on (and cleared from) the browser
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub max_age_secs: i64,
}

impl SessionCookie {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            name: cfg.security.cookie_name.clone(),
            domain: cfg
                .security
                .cookie_domain
                .clone()
                .filter(|d| !d.is_empty()),
            secure: !cfg.server.is_development(),
            max_age_secs: cfg.security.cookie_max_age_hours * 3600,
        }
    }

    fn render(&self, value: &str, max_age_secs: i64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.name, value, max_age_secs
        );
        if let Some(domain) = &self.domain {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value carrying `token`
    pub fn issue(&self, token: &str) -> String {
        self.render(token, self.max_age_secs)
    }

    /// `Set-Cookie` value that expires the session cookie
    pub fn clear(&self) -> String {
        self.render("", 0)
    }
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
