use chrono::{DateTime, Utc};
use kindred_types::models::{Partner, User};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::error::{CoreError, CoreResult};

const CONNECT_SUFFIX_LEN: usize = 4;
const MAX_NAME_LEN: usize = 48;

pub const DEMO_NAME: &str = "Demo";

pub fn new_user(name: &str, email: Option<&str>) -> CoreResult<User> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::InvalidInput(format!(
            "name must be 1-{} characters",
            MAX_NAME_LEN
        )));
    }

    let email = email.map(str::trim).filter(|e| !e.is_empty());
    if let Some(email) = email {
        if !email.contains('@') {
            return Err(CoreError::InvalidInput(format!("bad email: {}", email)));
        }
    }

    Ok(User {
        name: name.to_string(),
        email: email.map(String::from),
        connect_id: connect_id_for(name),
        adult_verified: false,
        demo: false,
    })
}

/// The built-in account used to browse without signing up.
pub fn demo_user() -> User {
    User {
        name: DEMO_NAME.to_string(),
        email: None,
        connect_id: connect_id_for(DEMO_NAME),
        adult_verified: true,
        demo: true,
    }
}

pub fn verify_adult(user: &mut User) {
    user.adult_verified = true;
}

/// `ALEX-7Q2K`: alphanumeric slug of the name plus a random suffix.
pub fn connect_id_for(name: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CONNECT_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("{}-{}", slug(name), suffix)
}

/// Link a partner by their connect code. Pairing is local only; a second
/// pairing replaces the first.
pub fn pair(current: &User, connect_id: &str, name: &str, now: DateTime<Utc>) -> CoreResult<Partner> {
    let connect_id = connect_id.trim().to_ascii_uppercase();
    if !is_connect_id(&connect_id) {
        return Err(CoreError::InvalidInput(format!("bad connect code: {}", connect_id)));
    }
    if connect_id == current.connect_id {
        return Err(CoreError::InvalidInput("cannot pair with yourself".into()));
    }

    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::InvalidInput("partner name is empty".into()));
    }

    Ok(Partner {
        name: name.to_string(),
        connect_id,
        paired_at: now,
    })
}

fn slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(12)
        .collect();
    if slug.is_empty() { "USER".to_string() } else { slug }
}

fn is_connect_id(code: &str) -> bool {
    let Some((head, tail)) = code.rsplit_once('-') else {
        return false;
    };
    !head.is_empty()
        && head.chars().all(|c| c.is_ascii_alphanumeric())
        && tail.len() == CONNECT_SUFFIX_LEN
        && tail.chars().all(|c| c.is_ascii_alphanumeric())
}
