//! Declaration scanning over Lua script text
//!
//! The scanner locates four declaration shapes with structural text patterns:
//! network event registrations, callback registrations, command registrations,
//! and export bindings. It is deliberately not a Lua parser - fragments that
//! do not match a pattern are skipped, never an error. The matching strategy
//! is an implementation detail behind [`scan`]; callers only see the
//! extracted declaration set.

use fxdoc_manifest::{Callback, Command, CommandParam, Event, Export, ParamAnnotation};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

/// Everything extracted from one script's text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationSet {
    pub events: Vec<Event>,
    pub callbacks: Vec<Callback>,
    pub commands: Vec<Command>,
    pub exports: Vec<Export>,
}

// A declaration's doc block is the run of annotation lines directly above it,
// with no intervening blank or unrelated line. The `(?:...)*` group only
// spans such a contiguous run, so a gap detaches the block.
static EVENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^((?:[ \t]*---@param[^\n]*\n)*)[ \t]*RegisterNetEvent\(\s*['"]([^'"]+)['"]\s*,\s*function\s*\(([^)]*)\)"#,
    )
    .expect("static pattern")
});

static CALLBACK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^((?:[ \t]*---@param[^\n]*\n)*)[ \t]*lib\.callback\.register\(\s*['"]([^'"]+)['"]\s*,\s*function\s*\(([^)]*)\)"#,
    )
    .expect("static pattern")
});

static PARAM_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*---@param\s+(\w+)\s+(\S+)").expect("static pattern"));

static RETURN_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*---@return\s+(\S+)").expect("static pattern"));

static COMMAND_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*lib\.addCommand\(\s*['"]([^'"]+)['"]\s*,\s*\{"#)
        .expect("static pattern")
});

static AFTER_TABLE_FUNCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*,\s*function").expect("static pattern"));

static PARAMS_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"params\s*=\s*\{").expect("static pattern"));

static TABLE_ELEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("static pattern"));

static NAME_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name\s*=\s*['"]([^'"]+)['"]"#).expect("static pattern"));

static TYPE_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"type\s*=\s*['"]([^'"]+)['"]"#).expect("static pattern"));

static HELP_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"help\s*=\s*['"]([^'"]*)['"]"#).expect("static pattern"));

static EXPORT_BIND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*exports\(\s*['"]([^'"]+)['"]\s*,\s*([A-Za-z_]\w*)\s*\)"#)
        .expect("static pattern")
});

static FUNCTION_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^((?:[ \t]*---@(?:param|return)[^\n]*\n)*)[ \t]*(?:local\s+)?function\s+([A-Za-z_]\w*)\s*\(([^)]*)\)",
    )
    .expect("static pattern")
});

static FUNCTION_ASSIGN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^((?:[ \t]*---@(?:param|return)[^\n]*\n)*)[ \t]*local\s+([A-Za-z_]\w*)\s*=\s*function\s*\(([^)]*)\)",
    )
    .expect("static pattern")
});

/// Extract every declaration from one script's source text
///
/// Pure function of the text and the owning resource name; output order
/// follows source order within each declaration kind.
pub fn scan(source: &str, resource: &str) -> DeclarationSet {
    let set = DeclarationSet {
        events: scan_events(source),
        callbacks: scan_callbacks(source),
        commands: scan_commands(source),
        exports: scan_exports(source, resource),
    };
    debug!(
        events = set.events.len(),
        callbacks = set.callbacks.len(),
        commands = set.commands.len(),
        exports = set.exports.len(),
        "scanned script"
    );
    set
}

fn scan_events(source: &str) -> Vec<Event> {
    EVENT_RE
        .captures_iter(source)
        .map(|caps| Event {
            name: caps[2].to_string(),
            args: split_args(&caps[3]),
            annotations: parse_annotations(&caps[1]),
        })
        .collect()
}

fn scan_callbacks(source: &str) -> Vec<Callback> {
    CALLBACK_RE
        .captures_iter(source)
        .map(|caps| Callback {
            name: caps[2].to_string(),
            args: split_args(&caps[3]),
            annotations: parse_annotations(&caps[1]),
        })
        .collect()
}

/// Comma-split a raw parenthesized parameter list, dropping empties
fn split_args(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_annotations(block: &str) -> Vec<ParamAnnotation> {
    PARAM_LINE_RE
        .captures_iter(block)
        .map(|caps| ParamAnnotation {
            name: caps[1].to_string(),
            ty: caps[2].to_string(),
        })
        .collect()
}

// =============================================================================
// COMMANDS
// =============================================================================

fn scan_commands(source: &str) -> Vec<Command> {
    let mut commands = Vec::new();

    for caps in COMMAND_START_RE.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        // The match ends right after the option table's opening brace
        let Some((table, after)) = balanced_table(source, whole.end()) else {
            continue;
        };
        if !AFTER_TABLE_FUNCTION_RE.is_match(&source[after..]) {
            continue;
        }
        commands.push(parse_command(&caps[1], table));
    }

    commands
}

/// Capture a brace-delimited table body starting just inside its `{`
///
/// Returns the body text and the offset one past the closing brace. The
/// depth counter is the same trick used for nested-bracket splitting below;
/// an unbalanced table returns None and the candidate is skipped.
fn balanced_table(source: &str, open: usize) -> Option<(&str, usize)> {
    let mut depth = 1usize;
    for (idx, ch) in source[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = open + idx;
                    return Some((&source[open..end], end + 1));
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_command(name: &str, table: &str) -> Command {
    let (params, params_span) = parse_command_params(table);

    // Search the top-level help outside the params array so a parameter's
    // own help field can never be mistaken for it
    let help = match params_span {
        Some((start, end)) => HELP_FIELD_RE
            .captures(&table[..start])
            .or_else(|| HELP_FIELD_RE.captures(&table[end..]))
            .map(|caps| caps[1].trim().to_string()),
        None => HELP_FIELD_RE
            .captures(table)
            .map(|caps| caps[1].trim().to_string()),
    };

    Command {
        name: name.to_string(),
        help,
        params,
    }
}

/// Parse the nested `params = { {name=..., type=..., help=...}, ... }` array
///
/// Returns the descriptors in source order plus the byte span the array
/// occupies inside the option table.
fn parse_command_params(table: &str) -> (Vec<CommandParam>, Option<(usize, usize)>) {
    let Some(field) = PARAMS_FIELD_RE.find(table) else {
        return (Vec::new(), None);
    };
    let Some((body, after)) = balanced_table(table, field.end()) else {
        return (Vec::new(), None);
    };

    let params = TABLE_ELEMENT_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let element = caps.get(1)?.as_str();
            let name = NAME_FIELD_RE.captures(element)?[1].to_string();
            Some(CommandParam {
                name,
                ty: TYPE_FIELD_RE
                    .captures(element)
                    .map(|c| c[1].to_string())
                    .unwrap_or_default(),
                help: HELP_FIELD_RE
                    .captures(element)
                    .map(|c| c[1].trim().to_string())
                    .unwrap_or_default(),
            })
        })
        .collect();

    (params, Some((field.start(), after)))
}

// =============================================================================
// EXPORTS
// =============================================================================

struct FunctionDef {
    name: String,
    offset: usize,
    args: Vec<String>,
    doc_block: String,
}

/// Two-pass export extraction
///
/// Pass 1 records `exports('<name>', <ident>)` bindings with their offsets.
/// Pass 2 records every function definition. A binding links to the nearest
/// definition above it with the bound identifier's name; bindings with no
/// such definition produce nothing.
fn scan_exports(source: &str, resource: &str) -> Vec<Export> {
    let defs = function_defs(source);

    EXPORT_BIND_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let bind_offset = caps.get(0)?.start();
            let public_name = &caps[1];
            let ident = &caps[2];

            let def = defs
                .iter()
                .filter(|def| def.offset < bind_offset && def.name == ident)
                .max_by_key(|def| def.offset)?;

            Some(Export {
                name: public_name.to_string(),
                resource: resource.to_string(),
                args: def.args.clone(),
                arg_types: annotation_types(&def.doc_block),
                return_type: RETURN_LINE_RE
                    .captures(&def.doc_block)
                    .map(|c| c[1].to_string()),
            })
        })
        .collect()
}

fn function_defs(source: &str) -> Vec<FunctionDef> {
    let mut defs: Vec<FunctionDef> = [&*FUNCTION_DEF_RE, &*FUNCTION_ASSIGN_RE]
        .iter()
        .flat_map(|re| {
            re.captures_iter(source).filter_map(|caps| {
                Some(FunctionDef {
                    name: caps[2].to_string(),
                    offset: caps.get(0)?.start(),
                    args: split_args(&caps[3]),
                    doc_block: caps[1].to_string(),
                })
            })
        })
        .collect();
    defs.sort_by_key(|def| def.offset);
    defs
}

fn annotation_types(doc_block: &str) -> BTreeMap<String, String> {
    PARAM_LINE_RE
        .captures_iter(doc_block)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_event() {
        let source = "\
---@param src number
---@param data table
RegisterNetEvent('bank:deposit', function(src, data)
    print(src)
end)
";
        let set = scan(source, "bank");
        assert_eq!(set.events.len(), 1);

        let event = &set.events[0];
        assert_eq!(event.name, "bank:deposit");
        assert_eq!(event.args, vec!["src", "data"]);
        assert_eq!(event.annotations.len(), 2);
        assert_eq!(event.annotations[0].name, "src");
        assert_eq!(event.annotations[0].ty, "number");
        assert_eq!(event.annotations[1].name, "data");
        assert_eq!(event.annotations[1].ty, "table");
    }

    #[test]
    fn test_event_without_params() {
        let set = scan("RegisterNetEvent('ui:close', function()\nend)\n", "ui");
        assert_eq!(set.events.len(), 1);
        assert!(set.events[0].args.is_empty());
        assert!(set.events[0].annotations.is_empty());
    }

    #[test]
    fn test_blank_line_detaches_doc_block() {
        let source = "\
---@param src number

RegisterNetEvent('bank:withdraw', function(src)
end)
";
        let set = scan(source, "bank");
        assert_eq!(set.events.len(), 1);
        assert!(set.events[0].annotations.is_empty());
    }

    #[test]
    fn test_indented_registration_with_doc_block() {
        let source = "\
do
    ---@param id number
    RegisterNetEvent('veh:lock', function(id)
    end)
end
";
        let set = scan(source, "veh");
        assert_eq!(set.events.len(), 1);
        assert_eq!(set.events[0].annotations.len(), 1);
        assert_eq!(set.events[0].annotations[0].name, "id");
    }

    #[test]
    fn test_callback_registration() {
        let source = "\
---@param source number
lib.callback.register('bank:getBalance', function(source, account)
    return 0
end)
";
        let set = scan(source, "bank");
        assert!(set.events.is_empty());
        assert_eq!(set.callbacks.len(), 1);

        let callback = &set.callbacks[0];
        assert_eq!(callback.name, "bank:getBalance");
        assert_eq!(callback.args, vec!["source", "account"]);
        assert_eq!(callback.annotations.len(), 1);
    }

    #[test]
    fn test_command_with_params_array() {
        let source = "\
lib.addCommand('givemoney', {
    help = 'Give money to a player',
    params = {
        {name = 'target', type = 'playerId', help = 'Who receives it'},
        {name = 'amount', type = 'number', help = 'How much'},
    },
}, function(source, args)
end)
";
        let set = scan(source, "bank");
        assert_eq!(set.commands.len(), 1);

        let command = &set.commands[0];
        assert_eq!(command.name, "givemoney");
        assert_eq!(command.help.as_deref(), Some("Give money to a player"));
        assert_eq!(command.params.len(), 2);
        assert_eq!(command.params[0].name, "target");
        assert_eq!(command.params[0].ty, "playerId");
        assert_eq!(command.params[1].name, "amount");
        assert_eq!(command.params[1].help, "How much");
    }

    #[test]
    fn test_command_without_help_or_params() {
        let set = scan(
            "lib.addCommand('revive', {}, function(source)\nend)\n",
            "med",
        );
        assert_eq!(set.commands.len(), 1);
        assert!(set.commands[0].help.is_none());
        assert!(set.commands[0].params.is_empty());
    }

    #[test]
    fn test_unbalanced_command_table_is_skipped() {
        let set = scan("lib.addCommand('broken', {\n    help = 'oops',\n", "x");
        assert!(set.commands.is_empty());
    }

    #[test]
    fn test_param_help_not_mistaken_for_command_help() {
        let source = "\
lib.addCommand('car', {
    params = {
        {name = 'model', type = 'string', help = 'Vehicle model'},
    },
}, function(source, args)
end)
";
        let set = scan(source, "garage");
        assert_eq!(set.commands.len(), 1);
        assert!(set.commands[0].help.is_none());
        assert_eq!(set.commands[0].params[0].help, "Vehicle model");
    }

    #[test]
    fn test_export_links_to_nearest_preceding_function() {
        let source = "\
---@param account string
---@param amount number
---@return boolean
local function addMoney(account, amount)
    return true
end

exports('AddMoney', addMoney)
";
        let set = scan(source, "bank");
        assert_eq!(set.exports.len(), 1);

        let export = &set.exports[0];
        assert_eq!(export.name, "AddMoney");
        assert_eq!(export.resource, "bank");
        assert_eq!(export.args, vec!["account", "amount"]);
        assert_eq!(export.arg_types.get("account").map(String::as_str), Some("string"));
        assert_eq!(export.arg_types.get("amount").map(String::as_str), Some("number"));
        assert_eq!(export.return_type.as_deref(), Some("boolean"));
    }

    #[test]
    fn test_export_before_definition_is_skipped() {
        let source = "\
exports('AddMoney', addMoney)

local function addMoney(account)
end
";
        let set = scan(source, "bank");
        assert!(set.exports.is_empty());
    }

    #[test]
    fn test_export_from_assigned_function() {
        let source = "\
---@param plate string
local findVehicle = function(plate)
end

exports('FindVehicle', findVehicle)
";
        let set = scan(source, "garage");
        assert_eq!(set.exports.len(), 1);
        assert_eq!(set.exports[0].args, vec!["plate"]);
        assert_eq!(
            set.exports[0].arg_types.get("plate").map(String::as_str),
            Some("string")
        );
        assert!(set.exports[0].return_type.is_none());
    }

    #[test]
    fn test_export_picks_closest_matching_definition() {
        let source = "\
local function handler(a)
end

---@param x number
local function handler(x, y)
end

exports('Handler', handler)
";
        let set = scan(source, "core");
        assert_eq!(set.exports.len(), 1);
        // The later (closer) definition wins
        assert_eq!(set.exports[0].args, vec!["x", "y"]);
    }

    #[test]
    fn test_scan_is_idempotent_and_ordered() {
        let source = "\
RegisterNetEvent('a:first', function(x)
end)

RegisterNetEvent('a:second', function(y)
end)
";
        let first = scan(source, "a");
        let second = scan(source, "a");
        assert_eq!(first, second);
        assert_eq!(first.events[0].name, "a:first");
        assert_eq!(first.events[1].name, "a:second");
    }

    #[test]
    fn test_annotation_subset_of_args() {
        let source = "\
---@param src number
RegisterNetEvent('job:clockIn', function(src, shift, site)
end)
";
        let set = scan(source, "job");
        assert_eq!(set.events[0].args.len(), 3);
        assert_eq!(set.events[0].annotations.len(), 1);
    }
}
