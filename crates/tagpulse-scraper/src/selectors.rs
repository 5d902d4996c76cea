//! Page locations and CSS patterns for the platform's web UI.
//!
//! Each list is ordered by preference; callers try entries in order and take
//! the first that matches.

use tagpulse_core::PLATFORM_BASE_URL;

pub const POST_LINK: &str = "a[href*='/p/']";
pub const POST_IMAGE: &str = "img";
pub const FEED_ARTICLE: &str = "article";
pub const POST_SECTION: &str = "section";
pub const BUTTON: &str = "button";

pub const USERNAME_FIELDS: &[&str] = &[
    "input[name='username']",
    "input[aria-label='Phone number, username, or email']",
    "input[type='text']",
];

pub const PASSWORD_FIELDS: &[&str] = &[
    "input[name='password']",
    "input[aria-label='Password']",
    "input[type='password']",
];

/// Any of these present means the home page loaded after login.
pub const LOGGED_IN_MARKERS: &[&str] = &[
    "svg[aria-label='Home']",
    "a[href='/']",
    "svg[aria-label='Search']",
];

/// Caption candidates: pattern, how many matches to inspect, minimum length.
pub const CAPTION_CANDIDATES: &[(&str, usize, usize)] =
    &[("span[dir='auto']", 5, 11), ("h1 ~ div span", 3, 0)];

pub const LOGIN_PATH: &str = "/accounts/login/";

#[must_use]
pub fn home_url() -> String {
    format!("{PLATFORM_BASE_URL}/")
}

#[must_use]
pub fn login_url() -> String {
    format!("{PLATFORM_BASE_URL}{LOGIN_PATH}")
}

/// Topic page listing recent posts for `tag` (no leading `#`).
#[must_use]
pub fn tag_page_url(tag: &str) -> String {
    format!("{PLATFORM_BASE_URL}/explore/tags/{tag}/")
}
