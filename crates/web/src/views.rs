//! Server-rendered HTML for the campaign form and results page.

use crate::rest::CampaignSession;
use studio_core::types::{Audience, Platform};
use uuid::Uuid;

/// Minimal HTML escaping for interpolated user/model text.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Confidence score in [0, 1] rendered as a whole percent (0.932 -> "93%").
pub fn format_confidence(score: f32) -> String {
    format!("{:.0}%", score * 100.0)
}

/// Download artifact name for a brand ("Acme" -> "Acme_campaign.txt").
pub fn package_filename(brand: &str) -> String {
    format!("{brand}_campaign.txt")
}

/// Split hashtags into the two display columns: index parity decides the
/// column (hashtag i goes to column i mod 2).
pub fn hashtag_columns(hashtags: &[String]) -> (Vec<&String>, Vec<&String>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (i, tag) in hashtags.iter().enumerate() {
        if i % 2 == 0 {
            left.push(tag);
        } else {
            right.push(tag);
        }
    }
    (left, right)
}

const PAGE_STYLE: &str = "\
    body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; color: #222; }\n\
    form { background: #f8f9fa; border-radius: 10px; padding: 20px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }\n\
    label { display: block; margin-top: 0.8rem; font-weight: bold; }\n\
    .error { color: #b00020; border: 1px solid #b00020; border-radius: 10px; padding: 10px; }\n\
    .columns { display: flex; gap: 2rem; }\n\
    .column { flex: 1; }\n\
    .hashtag { font-family: monospace; background: #eef; border-radius: 4px; padding: 2px 6px; margin: 2px 0; display: inline-block; }\n\
    .metric { font-size: 1.4rem; }\n";

/// Campaign brief form.
pub fn form_page() -> String {
    let mut audience_inputs = String::new();
    for audience in Audience::ALL {
        let checked = if audience == Audience::YoungAdults {
            " checked"
        } else {
            ""
        };
        audience_inputs.push_str(&format!(
            "<label><input type=\"checkbox\" name=\"audience\" value=\"{}\"{}> {}</label>\n",
            audience.key(),
            checked,
            audience.display_name(),
        ));
    }

    let mut platform_options = String::new();
    for platform in Platform::ALL {
        platform_options.push_str(&format!(
            "<option value=\"{}\">{}</option>\n",
            platform.key(),
            platform.display_name(),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Campaign Studio</title>
<style>{style}</style>
</head>
<body>
<h1>Campaign Studio</h1>
<p>Generate viral marketing campaigns in seconds</p>
<div id="error" class="error" hidden></div>
<form id="campaign-form">
  <label for="brand">Brand Name</label>
  <input type="text" id="brand" name="brand" placeholder="Your Brand">
  <fieldset><legend>Target Audience</legend>
{audience_inputs}  </fieldset>
  <label for="platform">Platform</label>
  <select id="platform" name="platform">
{platform_options}  </select>
  <label for="goals">Campaign Goals</label>
  <textarea id="goals" name="goals" rows="5" placeholder="What do you want to achieve? (e.g., Increase engagement by 40%)"></textarea>
  <p><button type="submit">Generate Campaign</button></p>
</form>
<script>
document.getElementById('campaign-form').addEventListener('submit', async (e) => {{
  e.preventDefault();
  const errorBox = document.getElementById('error');
  errorBox.hidden = true;
  const audience = [...document.querySelectorAll('input[name="audience"]:checked')].map(c => c.value);
  const body = {{
    brand: document.getElementById('brand').value,
    audience: audience,
    platform: document.getElementById('platform').value || null,
    goals: document.getElementById('goals').value,
  }};
  const response = await fetch('/v1/campaign', {{
    method: 'POST',
    headers: {{'Content-Type': 'application/json'}},
    body: JSON.stringify(body),
  }});
  const payload = await response.json();
  if (!response.ok) {{
    errorBox.textContent = payload.message;
    errorBox.hidden = false;
    return;
  }}
  window.location = payload.results_url;
}});
</script>
</body>
</html>
"#,
        style = PAGE_STYLE,
        audience_inputs = audience_inputs,
        platform_options = platform_options,
    )
}

/// Results page for one stored campaign session.
pub fn results_page(id: Uuid, session: &CampaignSession) -> String {
    let brand = escape_html(&session.brand);

    let mut slogan_items = String::new();
    for slogan in &session.parsed.slogans {
        slogan_items.push_str(&format!("<li><strong>{}</strong></li>\n", escape_html(slogan)));
    }

    let (left, right) = hashtag_columns(&session.parsed.hashtags);
    let render_column = |tags: &[&String]| {
        tags.iter()
            .map(|t| format!("<div class=\"hashtag\">{}</div>", escape_html(t)))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let left_html = render_column(&left);
    let right_html = render_column(&right);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Campaign for {brand}</title>
<style>{style}</style>
</head>
<body>
<h1>Campaign Generated</h1>
<div class="columns">
  <div class="column">
    <h2>Visual Concept</h2>
    <img src="/v1/campaign/{id}/image.png" alt="Campaign visual" width="100%">
    <p><em>AI-generated visual for {brand}</em></p>
  </div>
  <div class="column">
    <h2>Campaign Content</h2>
    <h3>Slogans</h3>
    <ol>
{slogan_items}    </ol>
    <h3>Hashtags</h3>
    <div class="columns">
      <div class="column">{left_html}</div>
      <div class="column">{right_html}</div>
    </div>
    <h3>Sentiment Analysis</h3>
    <p class="metric">{label} &mdash; {confidence} Confidence</p>
  </div>
</div>
<p><a href="/v1/campaign/{id}/package" download>Download Campaign Package</a></p>
<p><a href="/">Start another campaign</a></p>
</body>
</html>
"#,
        brand = brand,
        style = PAGE_STYLE,
        id = id,
        slogan_items = slogan_items,
        left_html = left_html,
        right_html = right_html,
        label = session.sentiment.label.title(),
        confidence = format_confidence(session.sentiment.score),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use studio_core::types::{ParsedContent, Sentiment, SentimentLabel};

    fn session() -> CampaignSession {
        CampaignSession {
            brand: "Acme".to_string(),
            raw_text: "raw".to_string(),
            png: vec![],
            parsed: ParsedContent {
                slogans: vec!["One".to_string(), "Two<".to_string()],
                hashtags: vec![
                    "#a".to_string(),
                    "#b".to_string(),
                    "#c".to_string(),
                    "#d".to_string(),
                    "#e".to_string(),
                ],
            },
            sentiment: Sentiment {
                label: SentimentLabel::Positive,
                score: 0.932,
            },
            created_at: Utc::now(),
        }
    }

    // 1. Formatting helpers -------------------------------------------------

    #[test]
    fn test_confidence_whole_percent() {
        assert_eq!(format_confidence(0.932), "93%");
        assert_eq!(format_confidence(1.0), "100%");
        assert_eq!(format_confidence(0.5), "50%");
    }

    #[test]
    fn test_package_filename() {
        assert_eq!(package_filename("Acme"), "Acme_campaign.txt");
    }

    #[test]
    fn test_hashtag_columns_alternate_by_parity() {
        let tags: Vec<String> = ["#a", "#b", "#c", "#d", "#e"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let (left, right) = hashtag_columns(&tags);
        assert_eq!(left, vec!["#a", "#c", "#e"]);
        assert_eq!(right, vec!["#b", "#d"]);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }

    // 2. Page rendering -----------------------------------------------------

    #[test]
    fn test_results_page_renders_sentiment_and_slogans() {
        let html = results_page(Uuid::nil(), &session());
        assert!(html.contains("Positive &mdash; 93% Confidence"));
        assert!(html.contains("<li><strong>One</strong></li>"));
        // Model output is escaped before rendering.
        assert!(html.contains("Two&lt;"));
        assert!(html.contains("/package"));
    }

    #[test]
    fn test_form_page_defaults_young_adults() {
        let html = form_page();
        assert!(html.contains("value=\"young_adults\" checked"));
        assert!(html.contains("value=\"tik_tok\""));
    }
}
