use crate::error::WarmupResult;
use askama::Template;

/// Self-refreshing page shown while a service warms up
#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html>
<head>
<title>Preview environment starting</title>
<meta http-equiv="refresh" content="{{ refresh_seconds }}">
</head>
<body>
<h1>Waking up your preview environment</h1>
<p>The preview environment <code>{{ service }}</code> is starting. This page refreshes every {{ refresh_seconds }} seconds.</p>
<p>You will be redirected automatically as soon as it is ready.</p>
</body>
</html>
"#
)]
struct HoldingPage<'a> {
    service: &'a str,
    refresh_seconds: u64,
}

/// Render the holding page for a service. The service name is HTML-escaped.
pub fn render_holding_page(service: &str, refresh_seconds: u64) -> WarmupResult<String> {
    let page = HoldingPage {
        service,
        refresh_seconds,
    };
    Ok(page.render()?)
}
