use crate::{pages::flash::Flash, utils::encoding::escape_html};

pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body style="font-family: Arial;">
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body,
    )
}

pub fn flashes(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|flash| {
            format!(
                r#"<div style="{}">{}</div>"#,
                flash.category.style(),
                escape_html(&flash.message)
            )
        })
        .collect()
}

pub fn credentials_form(button: &str) -> String {
    format!(
        r#"<form method="POST">
    <label for="username">Username:</label><br>
    <input type="text" id="username" name="username" required><br><br>
    <label for="password">Password:</label><br>
    <input type="password" id="password" name="password" required><br><br>
    <button type="submit">{button}</button>
</form>"#
    )
}
