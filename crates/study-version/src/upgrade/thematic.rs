//! Variables selection trimming
//!
//! The `[variables selection]` section of `generaldata.ini` lists output
//! variables to keep (`select_var +`) or drop (`select_var -`). Several
//! upgrades replace per-group variables by a single aggregated one:
//!
//! - 9.2: short-term storage variables (`battery_level`, ...) become `STS by group`
//! - 9.3: thermal and renewable group variables (`nuclear`, `solar pv`, ...)
//!   become `DISPATCH. GEN.` and `RENEWABLE GEN.`

use crate::error::{UpgradeError, UpgradeResult};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use study_ini::{IniValue, Section};

/// Section holding the selection lists
pub const VARIABLES_SELECTION: &str = "variables selection";
/// Variables enabled explicitly
pub const SELECT_VAR_PLUS: &str = "select_var +";
/// Variables disabled explicitly
pub const SELECT_VAR_MINUS: &str = "select_var -";

const STS_BY_GROUP: &str = "STS by group";
const DISPATCH_GEN: &str = "DISPATCH. GEN.";
const RENEWABLE_GEN: &str = "RENEWABLE GEN.";

static STORAGE_VARIABLES: Lazy<HashSet<String>> = Lazy::new(|| {
    let groups = [
        "psp_open", "psp_closed", "pondage", "battery", "other1", "other2", "other3", "other4",
        "other5",
    ];
    let outputs = ["_injection", "_withdrawal", "_level"];
    groups
        .iter()
        .flat_map(|group| outputs.iter().map(move |output| format!("{group}{output}")))
        .collect()
});

static THERMAL_GROUPS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "nuclear",
        "lignite",
        "coal",
        "gas",
        "oil",
        "mix. fuel",
        "misc. dtg",
        "misc. dtg 2",
        "misc. dtg 3",
        "misc. dtg 4",
    ]
    .into_iter()
    .collect()
});

static RENEWABLE_GROUPS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "wind offshore",
        "wind onshore",
        "solar concrt.",
        "solar pv",
        "solar rooft",
        "renw. 1",
        "renw. 2",
        "renw. 3",
        "renw. 4",
    ]
    .into_iter()
    .collect()
});

fn items(value: &IniValue) -> Vec<IniValue> {
    match value {
        IniValue::List(items) => items.clone(),
        IniValue::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

fn token(value: &IniValue) -> String {
    value.to_string().to_lowercase()
}

fn is_thermal(value: &IniValue) -> bool {
    THERMAL_GROUPS.contains(token(value).as_str())
}

fn is_renewable(value: &IniValue) -> bool {
    RENEWABLE_GROUPS.contains(token(value).as_str())
}

/// Append `aggregate` unless the list already holds it
fn push_once(kept: &mut Vec<IniValue>, aggregate: &str) {
    let wanted = aggregate.to_lowercase();
    if !kept.iter().any(|v| token(v) == wanted) {
        kept.push(aggregate.into());
    }
}

/// Replace short-term storage variables by `STS by group`
///
/// Works on `select_var +` when present, `select_var -` otherwise.
/// `STS by group` is appended once when at least one variable was removed.
pub fn trim_storage_variables(selection: &mut Section) {
    let key = if selection.contains_key(SELECT_VAR_PLUS) {
        SELECT_VAR_PLUS
    } else {
        SELECT_VAR_MINUS
    };
    let Some(value) = selection.get_mut(key) else {
        return;
    };

    let all = items(value);
    let count = all.len();
    let mut kept: Vec<IniValue> = all
        .into_iter()
        .filter(|v| !STORAGE_VARIABLES.contains(&token(v)))
        .collect();
    if kept.len() < count {
        push_once(&mut kept, STS_BY_GROUP);
    }
    *value = IniValue::List(kept);
}

/// Replace thermal and renewable group variables by their aggregates
///
/// Group variables are removed from both lists. In `select_var +` they are
/// replaced by `DISPATCH. GEN.` / `RENEWABLE GEN.`.
///
/// # Errors
/// Returns [`UpgradeError::UnexpectedThematicTrimmingFields`] without
/// touching `selection` when both lists hold group variables.
pub fn trim_group_variables(selection: &mut Section) -> UpgradeResult<()> {
    let removable = |key: &str| -> Vec<String> {
        selection
            .get(key)
            .map(items)
            .unwrap_or_default()
            .iter()
            .filter(|v| is_thermal(v) || is_renewable(v))
            .map(ToString::to_string)
            .collect()
    };
    let positive = removable(SELECT_VAR_PLUS);
    let negative = removable(SELECT_VAR_MINUS);
    if !positive.is_empty() && !negative.is_empty() {
        return Err(UpgradeError::UnexpectedThematicTrimmingFields { positive, negative });
    }

    for (key, aggregate) in [(SELECT_VAR_PLUS, true), (SELECT_VAR_MINUS, false)] {
        let Some(value) = selection.get_mut(key) else {
            continue;
        };
        let all = items(value);
        let thermal = all.iter().any(is_thermal);
        let renewable = all.iter().any(is_renewable);
        let mut kept: Vec<IniValue> = all
            .into_iter()
            .filter(|v| !is_thermal(v) && !is_renewable(v))
            .collect();
        if aggregate && thermal {
            push_once(&mut kept, DISPATCH_GEN);
        }
        if aggregate && renewable {
            push_once(&mut kept, RENEWABLE_GEN);
        }
        *value = IniValue::List(kept);
    }
    Ok(())
}
