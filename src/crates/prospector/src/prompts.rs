//! Prompt text for the generation collaborator.
//!
//! Output constraints (length, placeholders, sign-off) are enforced through
//! the prompt contract, not validated programmatically.

use crate::record::LeadRecord;

/// Strict yes/no qualification prompt. Expects a JSON object with
/// `is_qualified` and `reason`.
pub fn qualification(record: &LeadRecord, research: &str) -> String {
    format!(
        r#"You are a strict sales qualification manager for {sender_company}.
We sell: {product}

Analyze the research data below.

LEAD: {lead} from {company}
RESEARCH:
{research}

STRICT CRITERIA FOR "QUALIFIED" (must meet ALL):
1. The company is in software, AI, or tech infrastructure.
2. The research contains SPECIFIC recent news (launches, funding, hiring).
3. The research is NOT just generic "About Us" text.

WHEN TO DISQUALIFY:
- The company is a restaurant, retail store, or other non-tech business.
- The research says "Access Denied", "Captcha", or could not be fetched.
- You are unsure.

Return ONLY JSON:
{{
    "is_qualified": boolean,
    "reason": "Be specific. Cite the news, or explain what is missing."
}}"#,
        sender_company = record.sender_company,
        product = record.sender_product,
        lead = record.lead_name,
        company = record.company,
        research = research,
    )
}

/// Ask for a plausible success story matching the lead's company profile.
/// The synthesized story is used as the similarity query against the
/// knowledge store; it retrieves better than raw research text does.
pub fn hypothetical_story(record: &LeadRecord) -> String {
    format!(
        r#"Write a short, plausible customer success story (3-4 sentences) that a
vendor selling "{product}" would tell a company like {company}.
Describe the kind of company, the problem, and a concrete measurable result.
Do not address anyone; just tell the story."#,
        product = record.sender_product,
        company = record.company,
    )
}

/// Cold-email drafting prompt, fed with the retrieved proof point and any
/// feedback from a previous review pass.
pub fn draft_email(record: &LeadRecord, proof_point: &str) -> String {
    let mut prompt = format!(
        r#"You are a B2B copywriter writing on behalf of {sender} at {sender_company}.
We sell: {product}

Write a short cold email to {lead} from {company}.

1. THE PROOF (you MUST mention this exact story):
"{proof}"

2. WHAT WE KNOW ABOUT THE LEAD:
{research}

INSTRUCTIONS:
- Open with their recent news or role; be specific.
- Transition into the proof story and its result.
- Close by asking for a short chat.
- Keep it under 100 words.
- No placeholder tokens like [Name]; every detail filled in.
- Sign off as {sender} from {sender_company}."#,
        sender = record.sender_name,
        sender_company = record.sender_company,
        product = record.sender_product,
        lead = record.lead_name,
        company = record.company,
        proof = proof_point,
        research = record.research_summary,
    );

    if let Some(feedback) = record
        .critique_feedback
        .as_deref()
        .filter(|f| !f.trim().is_empty())
    {
        prompt.push_str(&format!(
            "\n\nAN EDITOR REVIEWED YOUR LAST DRAFT. Fix every point below:\n{feedback}"
        ));
    }

    prompt
}

/// Editorial review prompt. Expects a JSON object with `is_perfect` and
/// `feedback`.
pub fn review(record: &LeadRecord) -> String {
    format!(
        r#"You are a ruthless email editor. Review this cold email draft sent on
behalf of {sender} at {sender_company}, pitching: {product}

DRAFT:
{draft}

Check that it is under 100 words, specific to {company}, mentions a concrete
proof story, has no placeholder tokens, and ends with a clear ask and sign-off.

Return ONLY JSON:
{{
    "is_perfect": boolean,
    "feedback": "Empty if perfect, otherwise concrete fixes."
}}"#,
        sender = record.sender_name,
        sender_company = record.sender_company,
        product = record.sender_product,
        draft = record.draft_email,
        company = record.company,
    )
}
