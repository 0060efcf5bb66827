use chrono::Datelike;
use tracing::info;

use crate::login::Credentials;

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub member_since: i32,
    pub total_ratings: u32,
}

/// Who is signed in. Lives only in memory; a restart signs everyone out.
#[derive(Debug, Clone, Default)]
pub struct Session {
    profile: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn sign_in(&mut self, credentials: &Credentials) {
        let name = credentials
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| display_name_from_email(&credentials.email));
        info!(user = %name, "signed in");
        self.profile = Some(UserProfile {
            name,
            email: credentials.email.clone(),
            member_since: chrono::Local::now().year(),
            total_ratings: 0,
        });
    }

    pub fn sign_out(&mut self) {
        if let Some(profile) = self.profile.take() {
            info!(user = %profile.name, "signed out");
        }
    }
}

fn display_name_from_email(email: &str) -> String {
    email
        .split('@')
        .next()
        .filter(|local| !local.is_empty())
        .unwrap_or(email)
        .to_string()
}
