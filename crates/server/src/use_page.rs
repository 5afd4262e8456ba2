//! The "use" help page: a static sidebar of four sub-pages and the included
//! template of the selected one.

use std::path::Path;

use anyhow::Context;
use shared::pages::PageKey;

const SIDEBAR_HEADER: &str = "Utilisation";
const TEMPLATE_DIR: &str = "use";
const TEMPLATE_EXTENSION: &str = "html";

pub fn render_sidebar(active: PageKey) -> String {
    let mut html = String::new();
    html.push_str("<ul class=\"nav nav-list\">\n");
    html.push_str(&format!("\t<li class=\"nav-header\">{SIDEBAR_HEADER}</li>\n"));
    for key in PageKey::ALL {
        let class = if key == active { " class=\"active\"" } else { "" };
        html.push_str(&format!(
            "\t<li{class}><a href=\"{}\">{}</a></li>\n",
            key.href(),
            key.label()
        ));
    }
    html.push_str("</ul>\n");
    html
}

pub fn render_use_page(active: PageKey, body: &str) -> String {
    format!(
        "<div class=\"row\">\n\
         <div class=\"span2 well\" style=\"padding: 8px 0;\">\n{}</div>\n\
         <div class=\"span9\">\n{}\n</div>\n\
         </div>\n",
        render_sidebar(active),
        body
    )
}

/// Reads `<templates_dir>/use/<key>.html`. A missing file is an error the
/// caller surfaces as a server failure.
pub async fn load_use_template(templates_dir: &Path, key: PageKey) -> anyhow::Result<String> {
    let path = templates_dir
        .join(TEMPLATE_DIR)
        .join(key.template_name())
        .with_extension(TEMPLATE_EXTENSION);
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read template '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/use_page_tests.rs"]
mod tests;
