//! Documentation fragment rendering
//!
//! Pure formatting: one self-contained markdown block per declaration, with
//! a heading, a usage snippet in the calling convention of the declaration
//! kind, and a bullet per known parameter.

use fxdoc_manifest::{Callback, Command, Event, Export, ParamAnnotation, ScriptScope};
use std::fmt::Write;

/// Heading text: the last namespace segment of a declaration name
fn short_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn param_bullets(args: &[String], annotations: &[ParamAnnotation]) -> String {
    let mut out = String::new();
    for arg in args {
        match annotations.iter().find(|a| &a.name == arg) {
            Some(annotation) => {
                let _ = writeln!(out, "- `{}` {}", annotation.name, annotation.ty);
            }
            None => {
                let _ = writeln!(out, "- `{arg}`");
            }
        }
    }
    out
}

/// Render one event as a reference fragment
///
/// The usage snippet shows the firing form for the declaring side: a
/// server-declared event is fired from a client, a client-declared event is
/// fired from the server (which addresses a player first), and a shared
/// event is fired locally.
pub fn event_fragment(event: &Event, scope: ScriptScope) -> String {
    let args = event.args.join(", ");
    let usage = match scope {
        ScriptScope::Server if event.args.is_empty() => {
            format!("TriggerServerEvent('{}')", event.name)
        }
        ScriptScope::Server => format!("TriggerServerEvent('{}', {})", event.name, args),
        ScriptScope::Client if event.args.is_empty() => {
            format!("TriggerClientEvent('{}', playerId)", event.name)
        }
        ScriptScope::Client => format!("TriggerClientEvent('{}', playerId, {})", event.name, args),
        ScriptScope::Shared if event.args.is_empty() => format!("TriggerEvent('{}')", event.name),
        ScriptScope::Shared => format!("TriggerEvent('{}', {})", event.name, args),
    };

    let mut fragment = format!("## {}\n\n```lua\n{}\n```\n", short_name(&event.name), usage);
    let bullets = param_bullets(&event.args, &event.annotations);
    if !bullets.is_empty() {
        fragment.push('\n');
        fragment.push_str(&bullets);
    }
    fragment
}

/// Render one callback as a reference fragment, in the awaiting form
pub fn callback_fragment(callback: &Callback) -> String {
    let usage = if callback.args.is_empty() {
        format!("local result = lib.callback.await('{}', false)", callback.name)
    } else {
        format!(
            "local result = lib.callback.await('{}', false, {})",
            callback.name,
            callback.args.join(", ")
        )
    };

    let mut fragment = format!(
        "## {}\n\n```lua\n{}\n```\n",
        short_name(&callback.name),
        usage
    );
    let bullets = param_bullets(&callback.args, &callback.annotations);
    if !bullets.is_empty() {
        fragment.push('\n');
        fragment.push_str(&bullets);
    }
    fragment
}

/// Render one export as a reference fragment, in the cross-resource call form
pub fn export_fragment(export: &Export) -> String {
    let usage = format!(
        "exports.{}:{}({})",
        export.resource,
        export.name,
        export.args.join(", ")
    );

    let mut fragment = format!("## {}\n\n```lua\n{}\n```\n", export.name, usage);

    if !export.args.is_empty() {
        fragment.push('\n');
        for arg in &export.args {
            match export.arg_types.get(arg) {
                Some(ty) => {
                    let _ = writeln!(fragment, "- `{arg}` {ty}");
                }
                None => {
                    let _ = writeln!(fragment, "- `{arg}`");
                }
            }
        }
    }

    if let Some(return_type) = &export.return_type {
        let _ = write!(fragment, "\nReturns: `{return_type}`\n");
    }

    fragment
}

/// Render one command as a reference fragment with `/name` usage
pub fn command_fragment(command: &Command) -> String {
    let mut usage = format!("/{}", command.name);
    for param in &command.params {
        let _ = write!(usage, " {}", param.name);
    }

    let mut fragment = format!("## /{}\n", command.name);
    if let Some(help) = &command.help {
        let _ = write!(fragment, "\n{help}\n");
    }
    let _ = write!(fragment, "\n```\n{usage}\n```\n");

    if !command.params.is_empty() {
        fragment.push('\n');
        for param in &command.params {
            if param.help.is_empty() {
                let _ = writeln!(fragment, "- `{}` {}", param.name, param.ty);
            } else {
                let _ = writeln!(fragment, "- `{}` {} - {}", param.name, param.ty, param.help);
            }
        }
    }

    fragment
}
