use jyotish_common::{Result, UserIdentity};
use jyotish_kundali::KundaliComposite;

use crate::prompts::{CHART_CONTEXT_TEMPLATE, GREETING_TEMPLATE};
use crate::providers::ChatMessage;

/// Synthetic user/model turns that hand the chart to the model.
///
/// Rebuilt on every chat call from the caller's chart context; callers never
/// store them in their own history.
pub fn build_priming_pair(
    chart: &KundaliComposite,
    identity: Option<&UserIdentity>,
) -> Result<(ChatMessage, ChatMessage)> {
    let chart_json = serde_json::to_string_pretty(chart)?;

    let name = identity.and_then(UserIdentity::name);
    let field = |get: fn(&UserIdentity) -> Option<&str>| identity.and_then(get).unwrap_or("");

    let context = CHART_CONTEXT_TEMPLATE
        .replace("{name}", name.unwrap_or("the user"))
        .replace("{dob}", field(UserIdentity::dob))
        .replace("{tob}", field(UserIdentity::tob))
        .replace("{pob}", field(UserIdentity::pob))
        .replace("{chart}", &chart_json);

    let greeting = GREETING_TEMPLATE.replace("{name}", name.unwrap_or("dear one"));

    Ok((ChatMessage::user(context), ChatMessage::model(greeting)))
}
