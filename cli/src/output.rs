use modcalc_core::Reply;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Format {
    /// Human readable blocks
    Text,
    /// A single JSON document per reply
    Json,
}

fn to_json(reply: &modcalc_core::Result<Reply>) -> serde_json::Result<serde_json::Value> {
    match reply {
        Ok(Reply::Combination(result)) => serde_json::to_value(result),
        Ok(Reply::Enhancement { result, .. }) => serde_json::to_value(result),
        Ok(Reply::Affixes { affixes, .. }) => Ok(json!({ "affixes": affixes })),
        Ok(reply @ (Reply::Help(_) | Reply::Usage(_))) => {
            Ok(json!({ "message": reply.to_string() }))
        }
        Err(err) => Ok(json!({ "error": "bad_request", "message": err.to_string() })),
    }
}

/// Renders a reply, every rendering ends with a new line
pub(crate) fn render(
    format: Format,
    reply: &modcalc_core::Result<Reply>,
) -> anyhow::Result<String> {
    Ok(match format {
        Format::Text => match reply {
            Ok(reply) => reply.to_string(),
            Err(err) => format!("error: {err}\n"),
        },
        Format::Json => {
            let mut out = serde_json::to_string(&to_json(reply)?)?;
            out.push('\n');
            out
        }
    })
}
