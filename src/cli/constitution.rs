//! Constitution commands.

use super::{CommandResult, parse_json_object, write_json};
use crate::models::{EvaluateRequest, EvaluationPriority, RuleFilter, RulePriority};
use crate::{BravoZeroClient, Error};
use std::io::Write;

/// Evaluates an action and prints the result.
///
/// A denial prints the full result, then returns the
/// [`Error::ConstitutionDenied`] so the caller can exit non-zero.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the request fails, or the
/// action is denied.
pub async fn cmd_evaluate<W: Write>(
    client: &BravoZeroClient,
    action: String,
    context: Option<&str>,
    priority: Option<&str>,
    writer: &mut W,
) -> CommandResult {
    let mut request = EvaluateRequest::new(action);
    if let Some(context) = context {
        request = request.with_context(parse_json_object(context)?);
    }
    if let Some(priority) = priority {
        let parsed = EvaluationPriority::parse(priority)
            .ok_or_else(|| format!("unknown priority: {priority}"))?;
        request = request.with_priority(parsed);
    }

    match client.constitution().evaluate(request).await {
        Ok(result) => write_json(writer, &result),
        Err(Error::ConstitutionDenied { reasoning, result }) => {
            write_json(writer, &result)?;
            Err(Error::ConstitutionDenied { reasoning, result }.into())
        },
        Err(e) => Err(e.into()),
    }
}

/// Prints the Omega score.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_omega<W: Write>(client: &BravoZeroClient, writer: &mut W) -> CommandResult {
    let omega = client.constitution().get_omega().await?;
    write_json(writer, &omega)
}

/// Lists rules.
///
/// # Errors
///
/// Returns an error if the priority is unknown or the request fails.
pub async fn cmd_rules<W: Write>(
    client: &BravoZeroClient,
    category: Option<String>,
    priority: Option<&str>,
    writer: &mut W,
) -> CommandResult {
    let mut filter = RuleFilter::new();
    if let Some(category) = category {
        filter = filter.with_category(category);
    }
    if let Some(priority) = priority {
        let parsed =
            RulePriority::parse(priority).ok_or_else(|| format!("unknown priority: {priority}"))?;
        filter = filter.with_priority(parsed);
    }

    let rules = client.constitution().list_rules(&filter).await?;
    write_json(writer, &rules)
}

/// Shows one rule.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_rule<W: Write>(client: &BravoZeroClient, id: &str, writer: &mut W) -> CommandResult {
    let rule = client.constitution().get_rule(id).await?;
    write_json(writer, &rule)
}

/// Shows the values database.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cmd_values<W: Write>(client: &BravoZeroClient, writer: &mut W) -> CommandResult {
    let values = client.constitution().get_values().await?;
    write_json(writer, &values)
}
