// SPDX-License-Identifier: MIT OR Apache-2.0

/// Canonicalizes a route template (§4.5): trims leading whitespace,
/// substitutes `[controller]`/`{controller}` with the class name minus a
/// trailing `Controller` suffix, prepends `/` if missing, and collapses
/// `//` to `/`.
pub fn canonicalize_route(route: &str, class_name: &str) -> String {
    let stub = class_name.strip_suffix("Controller").unwrap_or(class_name);
    let substituted = route.trim_start().replace("[controller]", stub).replace("{controller}", stub);
    let mut result = if substituted.starts_with('/') { substituted } else { format!("/{substituted}") };
    while result.contains("//") {
        result = result.replace("//", "/");
    }
    result
}

/// Composes a controller route and a method route into a full route
/// (§4.5): the method route wins outright if it starts with `/`.
pub fn compose_full_route(controller_route: &str, method_route: &str, class_name: &str) -> String {
    if method_route.starts_with('/') {
        canonicalize_route(method_route, class_name)
    } else if method_route.is_empty() {
        canonicalize_route(controller_route, class_name)
    } else {
        canonicalize_route(&format!("{controller_route}/{method_route}"), class_name)
    }
}

/// `HttpGet`/`HttpPost`/... attribute class name → HTTP verb (§4.5).
pub fn verb_from_attribute_name(name: &str) -> Option<&'static str> {
    const PREFIXES: &[(&str, &str)] = &[
        ("HttpGet", "GET"),
        ("HttpPost", "POST"),
        ("HttpPut", "PUT"),
        ("HttpDelete", "DELETE"),
        ("HttpPatch", "PATCH"),
        ("HttpHead", "HEAD"),
    ];
    PREFIXES.iter().find(|(prefix, _)| name.starts_with(prefix)).map(|(_, verb)| *verb)
}

/// `Get*`/`Post*`/... method-name prefix → HTTP verb, used for HTTP-client
/// call sites that have no explicit verb attribute (§4.5).
pub fn verb_from_method_name(name: &str) -> Option<&'static str> {
    const PREFIXES: &[(&str, &str)] = &[
        ("Get", "GET"),
        ("Post", "POST"),
        ("Put", "PUT"),
        ("Delete", "DELETE"),
        ("Patch", "PATCH"),
        ("Head", "HEAD"),
    ];
    PREFIXES.iter().find(|(prefix, _)| name.starts_with(prefix)).map(|(_, verb)| *verb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_controller_placeholder_and_collapses_slashes() {
        assert_eq!(canonicalize_route("[controller]//reports", "ReportsController"), "/Reports/reports");
        assert_eq!(canonicalize_route("{controller}/x", "Reports"), "/Reports/x");
        assert_eq!(canonicalize_route("reports", "ReportsController"), "/reports");
    }

    #[test]
    fn method_route_starting_with_slash_overrides_controller_route() {
        assert_eq!(compose_full_route("/api", "/reports", "ReportsController"), "/reports");
        assert_eq!(compose_full_route("/api", "reports", "ReportsController"), "/api/reports");
        assert_eq!(compose_full_route("[controller]/reports", "", "ReportsController"), "/Reports/reports");
    }

    #[test]
    fn verb_inference() {
        assert_eq!(verb_from_attribute_name("HttpGet"), Some("GET"));
        assert_eq!(verb_from_method_name("GetReportsAsync"), Some("GET"));
        assert_eq!(verb_from_method_name("Frobnicate"), None);
    }
}
