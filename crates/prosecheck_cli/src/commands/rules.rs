//! Rule override commands

use miette::{IntoDiagnostic, Result};
use prosecheck_config::{ConfigError, RuleDecision, RuleOverride};
use tracing::{info, warn};

use crate::commands::Context;

/// Lists the rules of `style` with their configured setting.
///
/// Rules come from the installed style files and from existing overrides,
/// so overrides for rules of a missing style still show up.
pub fn run_list(ctx: &Context, style: &str) -> Result<()> {
    let store = ctx.config_store();
    let overrides = store
        .list_configured_rules(&ctx.selector, style)
        .into_diagnostic()?;

    let mut rules = match store.rules_for_style(style) {
        Ok(rules) => rules,
        Err(e @ (ConfigError::StyleDir { .. } | ConfigError::NoStylesPath(_))) => {
            warn!("{}", e);
            Vec::new()
        }
        Err(e) => return Err(e).into_diagnostic(),
    };
    for o in &overrides {
        if !rules.contains(&o.rule) {
            rules.push(o.rule.clone());
        }
    }
    rules.sort();

    for rule in &rules {
        let setting = overrides
            .iter()
            .find(|o| &o.rule == rule)
            .map_or("default", setting_label);
        println!("{}.{} {}", style, rule, setting);
    }
    Ok(())
}

fn setting_label(o: &RuleOverride) -> &'static str {
    match o.decision() {
        RuleDecision::UseDefault => "default",
        RuleDecision::Disabled => "off",
        RuleDecision::Severity(severity) => severity.as_str(),
    }
}

pub fn run_set(ctx: &Context, style: &str, rule: &str, decision: RuleDecision) -> Result<()> {
    let store = ctx.config_store();
    let changed = store
        .set_rule_override(&ctx.selector, style, rule, decision)
        .into_diagnostic()?;

    if changed {
        info!("Updated {}.{} for {}", style, rule, ctx.selector);
    } else {
        info!("{}.{} is unchanged", style, rule);
    }
    Ok(())
}
