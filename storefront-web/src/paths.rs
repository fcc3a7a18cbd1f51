//! URL helpers that respect the deployment base path.
///
/// `PUBLIC_URL` is read at compile time (e.g. `/shop` when the mini-app is
/// served from a subdirectory). Without it paths are root-anchored.
#[must_use]
pub fn asset_path(relative: &str) -> String {
    join_base(option_env!("PUBLIC_URL").unwrap_or(""), relative)
}

/// Base path for the router, `None` when served from the root.
#[must_use]
pub fn router_base() -> Option<String> {
    normalized_base(option_env!("PUBLIC_URL").unwrap_or(""))
}

/// Product photo URL: absolute URLs pass through, relative ones are served
/// from the static asset directory.
#[must_use]
pub fn photo_url(photo: &str) -> String {
    if photo.starts_with("http://") || photo.starts_with("https://") || photo.starts_with("data:") {
        photo.to_string()
    } else {
        asset_path(&format!("static/img/{}", photo.trim_start_matches('/')))
    }
}

fn join_base(base: &str, relative: &str) -> String {
    let rel = relative.trim_start_matches('/');
    normalized_base(base).map_or_else(|| format!("/{rel}"), |base| format!("{base}/{rel}"))
}

fn normalized_base(base: &str) -> Option<String> {
    let base = base.trim().trim_end_matches('/');
    (!base.is_empty()).then(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_anchored_without_base() {
        assert_eq!(asset_path("static/img/logo.png"), "/static/img/logo.png");
        assert_eq!(router_base(), None);
    }

    #[test]
    fn base_is_trimmed_and_prefixed() {
        assert_eq!(join_base("/shop/", "/static/a.png"), "/shop/static/a.png");
        assert_eq!(normalized_base(" /shop/ "), Some(String::from("/shop")));
        assert_eq!(normalized_base("/"), None);
    }

    #[test]
    fn photo_urls_keep_absolute_sources() {
        assert_eq!(photo_url("https://cdn.example/p.jpg"), "https://cdn.example/p.jpg");
        assert_eq!(photo_url("pizza.jpg"), "/static/img/pizza.jpg");
    }
}
