//! The single prompt template shared by the text and image pipelines.

use crate::types::CampaignRequest;

/// Build the generation prompt from a validated campaign brief.
///
/// Fixed interpolation template; the trailing instruction is what the
/// downstream parser's "Slogans:" / "Hashtags:" markers lean on.
pub fn build_prompt(request: &CampaignRequest) -> String {
    let audience = request
        .audience
        .iter()
        .map(|a| a.display_name())
        .collect::<Vec<_>>()
        .join(", ");
    let platform = request
        .platform
        .map(|p| p.display_name())
        .unwrap_or_default();

    format!(
        "Create a marketing campaign for {} targeting {} on {}. \
         Campaign Goals: {}. \
         Generate 3 creative slogans and 5 relevant hashtags.",
        request.brand.trim(),
        audience,
        platform,
        request.goals.trim(),
    )
}
