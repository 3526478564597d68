use super::Error;
use regex::Regex;
use std::sync::LazyLock;

pub const PROFILE_PREFIX: &str = "https://www.reddit.com/user/";
pub const LISTING_SUFFIX: &str = "submitted/";

// Reddit usernames are 3 to 20 characters, which also keeps
// `toggle_user_<name>` under Telegram's 64-byte callback data limit.
static PROFILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://www\.reddit\.com/user/([A-Za-z0-9_-]{3,20})/$").expect("invalid regex")
});

/// A validated, normalized profile URL together with the username it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUrl {
    pub username: String,
    pub url: String,
}

/// Ensures exactly one trailing slash and strips a listing suffix the user
/// may have pasted along with the profile link.
pub fn normalize(input: &str) -> String {
    let mut url = input.trim().trim_end_matches('/').to_string();
    url.push('/');
    while let Some(stripped) = url.strip_suffix(LISTING_SUFFIX) {
        if !stripped.ends_with('/') {
            break;
        }
        url = stripped.to_string();
    }
    url
}

pub fn parse(input: &str) -> Result<ProfileUrl, Error> {
    let url = normalize(input);
    let Some(captures) = PROFILE_URL.captures(&url) else {
        return Err(Error::InvalidFormat(input.to_string()));
    };
    Ok(ProfileUrl {
        username: captures[1].to_string(),
        url,
    })
}

pub fn listing_url(profile_url: &str) -> String {
    format!("{profile_url}{LISTING_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_trailing_slash() {
        assert_eq!(
            normalize("https://www.reddit.com/user/alice"),
            "https://www.reddit.com/user/alice/"
        );
        assert_eq!(
            normalize("https://www.reddit.com/user/alice///"),
            "https://www.reddit.com/user/alice/"
        );
    }

    #[test]
    fn normalize_strips_listing_suffix() {
        assert_eq!(
            normalize("https://www.reddit.com/user/alice/submitted/"),
            "https://www.reddit.com/user/alice/"
        );
        assert_eq!(
            normalize("https://www.reddit.com/user/alice/submitted"),
            "https://www.reddit.com/user/alice/"
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in [
            "https://www.reddit.com/user/alice",
            "https://www.reddit.com/user/alice/",
            "https://www.reddit.com/user/Bob_99/submitted/",
            " https://www.reddit.com/user/carol-x/submitted ",
            "https://www.reddit.com/user/submitted/",
            "https://www.reddit.com/user/dave/submitted/submitted/",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input}");
        }
    }

    #[test]
    fn parse_valid() {
        let parsed = parse("https://www.reddit.com/user/Bob_99/submitted/").expect("valid url");
        assert_eq!(parsed.username, "Bob_99");
        assert_eq!(parsed.url, "https://www.reddit.com/user/Bob_99/");
        assert_eq!(
            listing_url(&parsed.url),
            "https://www.reddit.com/user/Bob_99/submitted/"
        );
    }

    #[test]
    fn parse_invalid() {
        for input in [
            "",
            "alice",
            "http://www.reddit.com/user/alice/",
            "https://reddit.com/user/alice/",
            "https://www.reddit.com/u/alice/",
            "https://www.reddit.com/user/",
            "https://www.reddit.com/user/alice/comments/",
            "https://www.reddit.com/user/al ice/",
            "https://www.reddit.com/user/ab/",
        ] {
            assert!(
                matches!(parse(input), Err(Error::InvalidFormat(_))),
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn parse_bounds_username_length() {
        let longest = "a".repeat(20);
        let parsed = parse(&format!("{PROFILE_PREFIX}{longest}/")).expect("20 characters");
        assert_eq!(parsed.username, longest);
        let input = format!("{PROFILE_PREFIX}{}/", "a".repeat(60));
        assert_eq!(parse(&input), Err(Error::InvalidFormat(input.clone())));
    }
}
