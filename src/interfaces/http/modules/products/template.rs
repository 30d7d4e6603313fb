//! HTML rendering for the storefront pages

use super::view_models::FeaturedProductsViewModel;

const PAGE_HEAD: &str = "<!DOCTYPE html>
<html lang=\"en\">
<head>
  <meta charset=\"utf-8\">
  <title>Featured products</title>
</head>
<body>
";

const PAGE_FOOT: &str = "</body>
</html>
";

/// Escape text for use in element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_product_list(products_view_model: &FeaturedProductsViewModel) -> String {
    let mut html = String::from(PAGE_HEAD);
    html.push_str("  <h1>Featured products</h1>\n");

    if products_view_model.products.is_empty() {
        html.push_str("  <p class=\"empty\">No featured products right now.</p>\n");
    } else {
        html.push_str("  <ul class=\"products\">\n");
        for product in &products_view_model.products {
            html.push_str(&format!(
                "    <li class=\"product\"><span class=\"name\">{}</span> \
                 <span class=\"price\">{}</span> \
                 <span class=\"summary\">{}</span></li>\n",
                escape_html(&product.name),
                escape_html(&product.unit_price.to_string()),
                escape_html(&product.summary_text()),
            ));
        }
        html.push_str("  </ul>\n");
    }

    html.push_str(PAGE_FOOT);
    html
}

pub fn render_error_page(message: &str) -> String {
    let mut html = String::from(PAGE_HEAD);
    html.push_str(&format!("  <h1>{}</h1>\n", escape_html(message)));
    html.push_str(PAGE_FOOT);
    html
}
