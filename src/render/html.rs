use plotly::Plot;

use crate::record::time::format_ground_time;
use crate::table::Dedication;

const STYLE: &str = r#"
        body {
            font-family: 'Segoe UI', sans-serif;
            background-color: #f4f6f9;
            margin: 0;
            padding: 0;
        }
        header {
            text-align: center;
            padding: 40px 20px 20px;
            background: #ffffff;
            box-shadow: 0px 2px 8px rgba(0, 0, 0, 0.04);
        }
        h1 {
            margin: 0;
            font-size: 32px;
        }
        .container {
            display: flex;
            justify-content: center;
            flex-wrap: wrap;
            max-width: 1300px;
            margin: 30px auto;
            gap: 20px;
            padding: 0 20px 40px;
        }
        .column {
            width: 48%;
            display: flex;
            flex-direction: column;
            gap: 20px;
        }
        .card {
            background-color: #ffffff;
            border-radius: 12px;
            padding: 20px;
            box-shadow: 0px 4px 12px rgba(0, 0, 0, 0.05);
        }
        .memorial {
            max-width: 600px;
            margin: 20px auto;
            background: #ffffff;
            border-radius: 12px;
            padding: 20px;
            box-shadow: 0px 4px 12px rgba(0, 0, 0, 0.05);
            text-align: center;
        }
        .memorial h4 {
            margin: 0 0 10px;
        }
        .memorial .name {
            font-size: 20px;
            font-weight: bold;
            color: #333;
        }
        .memorial .time {
            font-size: 14px;
            color: #777;
            margin-top: 6px;
        }
        @media (max-width: 768px) {
            .column {
                width: 100%;
            }
        }
"#;

/// Escape text for element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inline HTML for one chart, drawn into a `<div>` with the given id.
///
/// The charting library itself is not included; the page loads it once.
pub(crate) fn chart_fragment(plot: &Plot, div_id: &str) -> String {
    seal_script(&plot.to_inline_html(Some(div_id)))
}

/// Escape `</` inside the inline script so data strings cannot end it early.
fn seal_script(fragment: &str) -> String {
    let body_start = fragment
        .find("<script")
        .and_then(|open| fragment[open..].find('>').map(|end| open + end + 1));
    let body_end = fragment.rfind("</script>");
    match (body_start, body_end) {
        (Some(start), Some(end)) if start <= end => format!(
            "{}{}{}",
            &fragment[..start],
            fragment[start..end].replace("</", "<\\/"),
            &fragment[end..]
        ),
        _ => fragment.to_string(),
    }
}

/// Assemble the full page from rendered chart fragments.
pub(crate) fn compose_page(
    title: &str,
    plotly_cdn: &str,
    dedication: Option<&Dedication>,
    fragments: &[String],
) -> String {
    let title = escape_html(title);

    let mut left = String::new();
    let mut right = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        let column = if i % 2 == 0 { &mut left } else { &mut right };
        column.push_str("<div class=\"card\">");
        column.push_str(fragment);
        column.push_str("</div>\n");
    }

    let memorial = dedication.map(memorial_panel).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <script src="{cdn}"></script>
    <style>{style}    </style>
</head>
<body>
    <header>
        <h1>{title}</h1>
    </header>
{memorial}
    <div class="container">
        <div class="column">
{left}        </div>
        <div class="column">
{right}        </div>
    </div>
</body>
</html>
"#,
        title = title,
        cdn = escape_html(plotly_cdn),
        style = STYLE,
        memorial = memorial,
        left = left,
        right = right,
    )
}

fn memorial_panel(dedication: &Dedication) -> String {
    format!(
        r#"
    <div class="memorial">
        <h4>In memory of:</h4>
        <div class="name">{}</div>
        <div class="time">Ground time: {}</div>
    </div>
"#,
        escape_html(&dedication.name),
        format_ground_time(&dedication.ground_time)
    )
}
