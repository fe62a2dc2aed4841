//! Outline renderer.

use std::io::{self, stdout, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use serde_json::Value;

use crate::pipeline::MemoryHost;
use crate::types::NodeId;

const INDENT: &str = "  ";

/// Output options for [`write_tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeStyle {
    /// Emit ANSI colors.
    pub color: bool,
}

impl Default for TreeStyle {
    fn default() -> Self {
        Self { color: true }
    }
}

impl TreeStyle {
    pub fn plain() -> Self {
        Self { color: false }
    }
}

/// Write the subtree at `root` to `out`, one node per line.
pub fn write_tree<W: Write>(out: &mut W, host: &MemoryHost, root: NodeId, style: TreeStyle) -> io::Result<()> {
    write_node(out, host, root, 0, style)?;
    out.flush()
}

/// Write the subtree at `root` to stdout.
pub fn print_tree(host: &MemoryHost, root: NodeId) -> io::Result<()> {
    write_tree(&mut stdout(), host, root, TreeStyle::default())
}

fn write_node<W: Write>(out: &mut W, host: &MemoryHost, node: NodeId, depth: usize, style: TreeStyle) -> io::Result<()> {
    let pad = INDENT.repeat(depth);

    if let Some(text) = host.text(node) {
        queue!(out, Print(&pad))?;
        colored(out, style, Color::Green, &format!("{text:?}"))?;
        return queue!(out, Print("\n"));
    }

    let Some(tag) = host.tag(node) else {
        return Ok(());
    };

    queue!(out, Print(&pad))?;
    colored(out, style, Color::Cyan, &format!("<{tag}"))?;
    for name in host.property_names(node) {
        let value = match host.property(node, &name) {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => continue,
        };
        colored(out, style, Color::Yellow, &format!(" {name}"))?;
        queue!(out, Print(format!("=\"{value}\"")))?;
    }
    colored(out, style, Color::Cyan, ">")?;

    for event in host.listener_events(node) {
        colored(out, style, Color::Magenta, &format!(" [{event}]"))?;
    }
    queue!(out, Print("\n"))?;

    for child in host.children(node) {
        write_node(out, host, child, depth + 1, style)?;
    }
    Ok(())
}

fn colored<W: Write>(out: &mut W, style: TreeStyle, color: Color, text: &str) -> io::Result<()> {
    if style.color {
        queue!(out, SetForegroundColor(color), Print(text), ResetColor)
    } else {
        queue!(out, Print(text))
    }
}
